//! Plain-text renderings of a build.

use std::fmt::Write;

use crate::compile::CompiledTables;
use crate::merge::CanonicalMap;

/// `pinyin.txt`: one `U+XXXX: r1,r2  # 字` line per codepoint, ascending.
pub fn render_canonical(map: &CanonicalMap, version: &str, source: &str) -> String {
    let mut out = String::with_capacity(map.len() * 32);
    let _ = writeln!(out, "# version: {version}");
    let _ = writeln!(out, "# source: {source}");
    for (codepoint, readings) in map.iter() {
        let _ = writeln!(
            out,
            "{codepoint}: {}  # {}",
            readings.join(","),
            codepoint.as_char()
        );
    }
    out
}

/// `pinyin_compact.txt`: the reading table, the combination table and
/// every range table.
pub fn render_compact(compiled: &CompiledTables) -> String {
    let mut out = String::new();

    out.push_str("pinyins:\n");
    for row in &compiled.readings {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            row.reading, row.base, row.numbered, row.shorthand
        );
    }

    out.push_str("\npinyin_combinations:\n");
    for indices in &compiled.combinations {
        out.push_str(&join_numbers(indices));
        out.push('\n');
    }

    out.push_str("\npinyin_tables:\n");
    for table in &compiled.tables {
        let _ = writeln!(
            out,
            "0x{:X}, 0x{:X}:",
            table.range.start.value(),
            table.range.end.value()
        );
        out.push_str(&join_numbers(&table.entries));
        out.push('\n');
    }
    out
}

/// `all_pinyins.md`: every distinct reading and every distinct reading
/// list, with the summary counts.
///
/// Lists are printed as they appear in the canonical map, so two
/// codepoints holding the same readings in different orders give two lines.
pub fn render_report(map: &CanonicalMap, compiled: &CompiledTables) -> String {
    let summary = &compiled.summary;

    let mut readings: Vec<&str> = compiled.readings.iter().map(|r| r.reading.as_str()).collect();
    readings.sort_unstable();

    let mut lines: Vec<String> = map.iter().map(|(_, list)| list.join(" ")).collect();
    lines.sort_by(|a, b| {
        a.matches(' ')
            .count()
            .cmp(&b.matches(' ').count())
            .then_with(|| a.cmp(b))
    });
    lines.dedup();

    let mut out = String::new();
    let _ = writeln!(out, "## All Pinyins");
    let _ = writeln!(out, "{}", summary.readings);
    let _ = writeln!(out, "```");
    let _ = writeln!(out, "{}", readings.join(" "));
    let _ = writeln!(out, "```");
    let _ = writeln!(out);
    let _ = writeln!(out, "## All Pinyin Combinations");
    let _ = writeln!(
        out,
        "{} + {} = {}",
        summary.single_combinations,
        summary.multi_combinations,
        summary.total_combinations()
    );
    let _ = writeln!(out, "```");
    for line in &lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(out, "```");
    out
}

fn join_numbers(values: &[u16]) -> String {
    let mut out = String::with_capacity(values.len() * 5);
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{v}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codepoint::Codepoint;
    use crate::compile::{CompactRange, TableCompiler};
    use crate::merge::{merge_layers, MergePolicy, SourceLayer};
    use crate::shuangpin::ShuangpinScheme;

    fn cp(c: char) -> Codepoint {
        Codepoint::from(c)
    }

    fn sample() -> (CanonicalMap, CompiledTables) {
        let base = SourceLayer::new("base", MergePolicy::Base)
            .with_entry(cp('中'), ["zhōng", "zhòng"])
            .with_entry(cp('〇'), ["líng"])
            .with_entry(cp('丫'), ["yā"]);
        let map = merge_layers(base, []).unwrap();
        let ranges = vec![CompactRange::new(cp('丫'), cp('中')).unwrap()];
        let compiled = TableCompiler::new(ShuangpinScheme::xiaohe(), ranges)
            .unwrap()
            .compile(&map)
            .unwrap();
        (map, compiled)
    }

    #[test]
    fn test_render_canonical() {
        let (map, _) = sample();
        let text = render_canonical(&map, "0.11.0", "local");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "# version: 0.11.0",
                "# source: local",
                "U+3007: líng  # 〇",
                "U+4E2B: yā  # 丫",
                "U+4E2D: zhōng,zhòng  # 中",
            ]
        );
    }

    #[test]
    fn test_render_compact() {
        let (_, compiled) = sample();
        let text = render_compact(&compiled);
        let expected = "\
pinyins:
líng,ling,ling2,lk
yā,ya,ya1,ya
zhōng,zhong,zhong1,vs
zhòng,zhong,zhong4,vs

pinyin_combinations:
2,3

pinyin_tables:
0x4E2B, 0x4E2D:
1,65535,4
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_report() {
        let (map, compiled) = sample();
        let text = render_report(&map, &compiled);
        let expected = "\
## All Pinyins
4
```
líng yā zhòng zhōng
```

## All Pinyin Combinations
2 + 1 = 3
```
líng
yā
zhōng zhòng
```
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_report_keeps_canonical_list_order() {
        let base = SourceLayer::new("base", MergePolicy::Base)
            .with_entry(cp('中'), ["zhòng", "zhōng"])
            .with_entry(cp('仲'), ["zhōng", "zhòng"]);
        let map = merge_layers(base, []).unwrap();
        let compiled = TableCompiler::new(ShuangpinScheme::xiaohe(), vec![])
            .unwrap()
            .compile(&map)
            .unwrap();
        assert_eq!(compiled.combinations, vec![vec![0, 1]]);

        let text = render_report(&map, &compiled);
        assert!(text.contains("```\nzhòng zhōng\nzhōng zhòng\n```\n"), "{text}");
    }

    #[test]
    fn test_join_numbers() {
        assert_eq!(join_numbers(&[]), "");
        assert_eq!(join_numbers(&[7]), "7");
        assert_eq!(join_numbers(&[1, 65535, 4]), "1,65535,4");
    }
}
