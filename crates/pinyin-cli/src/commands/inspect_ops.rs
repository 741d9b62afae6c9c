use std::path::Path;
use std::process;

use pinyin_core::artifact::CompactArtifact;
use pinyin_core::codepoint::Codepoint;
use pinyin_core::compile::{Entry, ReadingRow};
use pinyin_core::shuangpin::ShuangpinScheme;

use crate::commands::config_ops;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn encode(readings: &[String], scheme_file: Option<&str>, json: bool) {
    let custom;
    let scheme = match scheme_file {
        Some(file) => {
            custom = config_ops::load_scheme(file);
            &custom
        }
        None => ShuangpinScheme::xiaohe(),
    };

    let rows: Vec<ReadingRow> = readings
        .iter()
        .map(|r| die!(ReadingRow::derive(r, scheme), "Error: {}"))
        .collect();

    if json {
        println!("{}", die!(serde_json::to_string_pretty(&rows), "Error: {}"));
        return;
    }
    for row in &rows {
        println!(
            "{}\t{}\t{}\t{}",
            row.reading, row.base, row.numbered, row.shorthand
        );
    }
}

pub fn info(file: &str) {
    let artifact = die!(
        CompactArtifact::open(Path::new(file)),
        "Error opening {file}: {}"
    );

    let reading_count = artifact.readings.len();
    println!("Readings:      {reading_count}");
    println!("Combinations:  {}", artifact.combinations.len());
    println!("Tables:        {}", artifact.tables.len());
    for table in &artifact.tables {
        let (mut missing, mut single, mut multi) = (0usize, 0usize, 0usize);
        for &value in &table.entries {
            match Entry::decode(value, reading_count) {
                Entry::Missing => missing += 1,
                Entry::Reading(_) => single += 1,
                Entry::Combination(_) => multi += 1,
            }
        }
        println!(
            "  {:<22} {:>6} slots  {:>6} single  {:>6} multi  {:>6} empty",
            table.range.to_string(),
            table.entries.len(),
            single,
            multi,
            missing
        );
    }

    println!("\nFirst readings:");
    for (i, row) in artifact.readings.iter().take(10).enumerate() {
        println!(
            "  [{i}] {}  {}  {}  {}",
            row.reading, row.base, row.numbered, row.shorthand
        );
    }
}

pub fn lookup(file: &str, chars: &[String]) {
    let artifact = die!(
        CompactArtifact::open(Path::new(file)),
        "Error opening {file}: {}"
    );

    for arg in chars {
        for codepoint in parse_targets(arg) {
            let codepoint = die!(codepoint, "Error: {}");
            match artifact.readings_of(codepoint) {
                Some(readings) => {
                    println!("{codepoint}  {}  {}", codepoint.as_char(), readings.join(","))
                }
                None => println!("{codepoint}  {}  (no entry)", codepoint.as_char()),
            }
        }
    }
}

/// `U+XXXX` names one codepoint; anything else is taken character by
/// character.
fn parse_targets(arg: &str) -> Vec<Result<Codepoint, pinyin_core::codepoint::CodepointError>> {
    if arg.starts_with("U+") {
        vec![arg.parse()]
    } else {
        arg.chars().map(|c| Ok(Codepoint::from(c))).collect()
    }
}
