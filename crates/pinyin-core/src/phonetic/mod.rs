//! Tone-diacritic normalization for pinyin readings.
//!
//! Every substitution is driven by a fixed table keyed on exact characters
//! or combining sequences, so `zhōng` → `zhong` → `zhong1` is the same on
//! every platform.

mod table;

use serde::{Deserialize, Serialize};

use table::TONE_MARKS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tone {
    First,
    Second,
    Third,
    Fourth,
    /// Neutral tone. Written as `5` since `0` is awkward to type.
    Neutral,
}

impl Tone {
    pub fn digit(self) -> char {
        match self {
            Tone::First => '1',
            Tone::Second => '2',
            Tone::Third => '3',
            Tone::Fourth => '4',
            Tone::Neutral => '5',
        }
    }
}

/// Strip tone diacritics, mapping the ü family to `v`.
///
/// Characters not in the table pass through unchanged.
pub fn base_form(reading: &str) -> String {
    let mut out = String::with_capacity(reading.len());
    let mut rest = reading;
    'scan: while let Some(c) = rest.chars().next() {
        for mark in TONE_MARKS {
            if let Some(tail) = rest.strip_prefix(mark.marked) {
                out.push_str(mark.base);
                rest = tail;
                continue 'scan;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Tone of the original (unstripped) reading.
///
/// Checked in priority order tone 1 → tone 4; a reading with no tone mark
/// is neutral.
pub fn tone_class(reading: &str) -> Tone {
    [Tone::First, Tone::Second, Tone::Third, Tone::Fourth]
        .into_iter()
        .find(|&tone| {
            TONE_MARKS
                .iter()
                .any(|m| m.tone == Some(tone) && reading.contains(m.marked))
        })
        .unwrap_or(Tone::Neutral)
}

/// `base_form(reading)` followed by the tone digit, e.g. `zhōng` → `zhong1`.
pub fn tone_numbered(reading: &str) -> String {
    let mut out = base_form(reading);
    out.push(tone_class(reading).digit());
    out
}
