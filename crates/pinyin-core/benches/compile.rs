use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pinyin_core::codepoint::Codepoint;
use pinyin_core::compile::{CompactRange, TableCompiler};
use pinyin_core::merge::{merge_layers, CanonicalMap, MergePolicy, SourceLayer};
use pinyin_core::shuangpin::ShuangpinScheme;

const SYLLABLES: &[&str] = &[
    "zhōng", "zhòng", "guó", "rén", "dà", "xiǎo", "shàng", "xià", "lǜ", "nǚ", "hǎo", "kàn",
    "chuān", "shuāng", "qióng", "yuè", "ài", "ēn", "ér", "ḿ",
];

fn bench_map(codepoints: u32) -> CanonicalMap {
    let mut base = SourceLayer::new("base", MergePolicy::Base);
    for i in 0..codepoints {
        let cp = Codepoint::new(0x4E00 + i).unwrap();
        let n = SYLLABLES.len() as u32;
        let readings: Vec<&str> = match i % 4 {
            0 => vec![SYLLABLES[(i % n) as usize], SYLLABLES[((i / 3) % n) as usize]],
            _ => vec![SYLLABLES[(i % n) as usize]],
        };
        base = base.with_entry(cp, readings);
    }
    merge_layers(base, []).unwrap()
}

fn bench_compile(c: &mut Criterion) {
    let scheme = ShuangpinScheme::xiaohe();
    let mut group = c.benchmark_group("compile");
    for size in [1_000u32, 20_000] {
        let map = bench_map(size);
        let range = CompactRange::new(
            Codepoint::new(0x3400).unwrap(),
            Codepoint::new(0x9FED).unwrap(),
        )
        .unwrap();
        let compiler = TableCompiler::new(scheme, vec![range]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| compiler.compile(map).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
