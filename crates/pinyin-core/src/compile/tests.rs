use super::*;
use crate::merge::{merge_layers, MergePolicy, SourceLayer};

fn cp(value: u32) -> Codepoint {
    Codepoint::new(value).unwrap()
}

fn range(start: u32, end: u32) -> CompactRange {
    CompactRange::new(cp(start), cp(end)).unwrap()
}

fn sample_map() -> CanonicalMap {
    let base = SourceLayer::new("base", MergePolicy::Base)
        .with_entry(cp(0x4E00), ["bà", "a"])
        .with_entry(cp(0x4E01), ["bá", "bā"])
        .with_entry(cp(0x4E02), ["bǎ", "a", "bā"])
        .with_entry(cp(0x4E03), ["a", "bà"])
        .with_entry(cp(0x4E04), ["bā"])
        .with_entry(cp(0x4E10), ["a"]);
    merge_layers(base, []).unwrap()
}

fn compile(map: &CanonicalMap, ranges: Vec<CompactRange>) -> CompiledTables {
    TableCompiler::new(ShuangpinScheme::xiaohe(), ranges)
        .unwrap()
        .compile(map)
        .unwrap()
}

#[test]
fn test_reading_index_order() {
    let compiled = compile(&sample_map(), vec![range(0x4E00, 0x4E05)]);
    let order: Vec<&str> = compiled.readings.iter().map(|r| r.reading.as_str()).collect();
    // a5 < ba1 < ba2 < ba3 < ba4
    assert_eq!(order, vec!["a", "bā", "bá", "bǎ", "bà"]);

    let ba = &compiled.readings[1];
    assert_eq!(ba.base, "ba");
    assert_eq!(ba.numbered, "ba1");
    assert_eq!(ba.shorthand, "ba");
    assert_eq!(compiled.readings[0].shorthand, "aa");
}

#[test]
fn test_reading_index_ties_break_on_original() {
    let base = SourceLayer::new("base", MergePolicy::Base)
        .with_entry(cp(0x6B38), ["ê"])
        .with_entry(cp(0x5384), ["e"]);
    let compiled = compile(&merge_layers(base, []).unwrap(), vec![]);
    let order: Vec<&str> = compiled.readings.iter().map(|r| r.reading.as_str()).collect();
    assert_eq!(order, vec!["e", "ê"]);
}

#[test]
fn test_combinations_sorted_by_length_then_indices() {
    let compiled = compile(&sample_map(), vec![range(0x4E00, 0x4E05)]);
    assert_eq!(
        compiled.combinations,
        vec![vec![0, 4], vec![1, 2], vec![0, 1, 3]]
    );
}

#[test]
fn test_compact_entries() {
    let compiled = compile(&sample_map(), vec![range(0x4E00, 0x4E05)]);
    let table = &compiled.tables[0];
    assert_eq!(table.entries, vec![5, 6, 7, 5, 1, SENTINEL]);
    assert_eq!(table.get(cp(0x4E04)), Some(1));
    assert_eq!(table.get(cp(0x4E10)), None);
}

#[test]
fn test_reordered_lists_share_combination() {
    let map = sample_map();
    let compiled = compile(&map, vec![range(0x4E00, 0x4E05)]);
    // U+4E00 [bà, a] and U+4E03 [a, bà]
    let table = &compiled.tables[0];
    assert_eq!(table.get(cp(0x4E00)), table.get(cp(0x4E03)));
}

#[test]
fn test_entries_decode_to_their_readings() {
    let map = sample_map();
    let compiled = compile(&map, vec![range(0x4E00, 0x4E0F)]);
    let reading_count = compiled.readings.len();
    let table = &compiled.tables[0];

    for value in 0x4E00..=0x4E0F {
        let codepoint = cp(value);
        let raw = table.get(codepoint).unwrap();
        match (Entry::decode(raw, reading_count), map.get(codepoint)) {
            (Entry::Missing, None) => {}
            (Entry::Reading(idx), Some([only])) => {
                assert!((idx as usize) < reading_count);
                assert_eq!(&compiled.readings[idx as usize].reading, only);
            }
            (Entry::Combination(id), Some(list)) => {
                assert!(raw as usize >= reading_count);
                let mut expected: Vec<&str> = list.iter().map(String::as_str).collect();
                expected.sort_by_key(|r| {
                    compiled.readings.iter().position(|row| row.reading == *r)
                });
                let actual: Vec<&str> = compiled.combinations[id as usize]
                    .iter()
                    .map(|&i| compiled.readings[i as usize].reading.as_str())
                    .collect();
                assert_eq!(actual, expected);
            }
            (entry, readings) => panic!("{codepoint}: {entry:?} vs {readings:?}"),
        }
    }
}

#[test]
fn test_out_of_range_codepoints_excluded() {
    let compiled = compile(
        &sample_map(),
        vec![range(0x3007, 0x3007), range(0x4E10, 0x4E11)],
    );
    assert_eq!(compiled.tables.len(), 2);
    assert_eq!(compiled.tables[0].entries, vec![SENTINEL]);
    assert_eq!(compiled.tables[1].entries, vec![0, SENTINEL]);
}

#[test]
fn test_summary() {
    let compiled = compile(&sample_map(), vec![]);
    assert_eq!(compiled.summary.readings, 5);
    // bā and a occur alone.
    assert_eq!(compiled.summary.single_combinations, 2);
    assert_eq!(compiled.summary.multi_combinations, 3);
    assert_eq!(compiled.summary.total_combinations(), 5);
}

#[test]
fn test_additive_variant_gets_combination() {
    let base = SourceLayer::new("base", MergePolicy::Base).with_entry(cp(0x4E2D), ["zhong"]);
    let adjust = SourceLayer::new("adjust", MergePolicy::Additive).with_entry(cp(0x4E2D), ["zhōng"]);
    let map = merge_layers(base, [adjust]).unwrap();
    assert_eq!(map.get(cp(0x4E2D)).unwrap(), ["zhōng", "zhong"]);

    let compiled = compile(&map, vec![range(0x4E00, 0x4E2F)]);
    assert_eq!(compiled.readings.len(), 2);
    assert_eq!(compiled.readings[0].numbered, "zhong1");
    assert_eq!(compiled.readings[1].numbered, "zhong5");
    assert_eq!(compiled.combinations, vec![vec![0, 1]]);
    let value = compiled.tables[0].get(cp(0x4E2D)).unwrap();
    assert_eq!(value, 2);
    assert_eq!(Entry::decode(value, 2), Entry::Combination(0));
}

#[test]
fn test_unencodable_reading_fails() {
    let base = SourceLayer::new("base", MergePolicy::Base).with_entry(cp(0x4E00), ["zhx"]);
    let map = merge_layers(base, []).unwrap();
    let err = TableCompiler::new(ShuangpinScheme::xiaohe(), vec![])
        .unwrap()
        .compile(&map)
        .unwrap_err();
    assert!(matches!(err, CompileError::Encode(_)));
    assert!(err.to_string().contains("zhx"));
}

#[test]
fn test_range_validation() {
    let err = CompactRange::new(cp(0x4E10), cp(0x4E00)).unwrap_err();
    assert!(matches!(err, CompileError::InvalidRange { .. }));

    let err = TableCompiler::new(
        ShuangpinScheme::xiaohe(),
        vec![range(0x3400, 0x4DBF), range(0x4DBF, 0x4E00)],
    )
    .err()
    .unwrap();
    assert!(matches!(err, CompileError::OverlappingRanges { .. }));
}

#[test]
fn test_range_len() {
    assert_eq!(range(0x3007, 0x3007).len(), 1);
    assert_eq!(range(0x3400, 0x9FED).len(), 0x9FED - 0x3400 + 1);
}

#[test]
fn test_entry_decode() {
    assert_eq!(Entry::decode(SENTINEL, 10), Entry::Missing);
    assert_eq!(Entry::decode(9, 10), Entry::Reading(9));
    assert_eq!(Entry::decode(10, 10), Entry::Combination(0));
    assert_eq!(Entry::decode(13, 10), Entry::Combination(3));
}

#[test]
fn test_compile_is_deterministic() {
    let map = sample_map();
    let a = compile(&map, vec![range(0x4E00, 0x4E10)]);
    let b = compile(&map, vec![range(0x4E00, 0x4E10)]);
    assert_eq!(a, b);
}
