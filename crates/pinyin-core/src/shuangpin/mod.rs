//! Two-key shorthand (shuangpin) encoding of pinyin syllables.
//!
//! A syllable is split into initial + final and each half becomes one key.
//! Syllables that the split cannot express are listed whole in the scheme.

mod config;

use std::collections::BTreeMap;
use std::sync::OnceLock;

pub use config::SchemeConfigError;

use crate::phonetic;

pub const DEFAULT_XIAOHE_TOML: &str = include_str!("default_xiaohe.toml");

/// Returns the embedded Xiaohe scheme TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_XIAOHE_TOML
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot encode {reading:?} (base form {base:?}): no code for final {final_part:?}")]
pub struct EncodeError {
    pub reading: String,
    pub base: String,
    pub final_part: String,
}

pub struct ShuangpinScheme {
    remaps: BTreeMap<String, String>,
    syllables: BTreeMap<String, String>,
    /// Longest cluster first, so `zh` wins over `z`.
    initials: Vec<(String, char)>,
    finals: BTreeMap<String, char>,
}

impl ShuangpinScheme {
    /// Build a scheme from TOML with `[remaps]`, `[syllables]`, `[initials]`
    /// and `[finals]` tables.
    pub fn from_toml(toml_str: &str) -> Result<Self, SchemeConfigError> {
        let tables = config::parse_tables(toml_str)?;
        let mut initials: Vec<(String, char)> = tables.initials.into_iter().collect();
        initials.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Ok(Self {
            remaps: tables.remaps,
            syllables: tables.syllables,
            initials,
            finals: tables.finals,
        })
    }

    /// The embedded Xiaohe scheme (lazy-init singleton).
    pub fn xiaohe() -> &'static ShuangpinScheme {
        static INSTANCE: OnceLock<ShuangpinScheme> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            ShuangpinScheme::from_toml(DEFAULT_XIAOHE_TOML)
                .expect("embedded Xiaohe scheme must be valid")
        })
    }

    pub fn num_initials(&self) -> usize {
        self.initials.len()
    }

    pub fn num_finals(&self) -> usize {
        self.finals.len()
    }

    /// Encode a reading (diacritics allowed) as exactly two characters.
    pub fn encode(&self, reading: &str) -> Result<String, EncodeError> {
        let base = phonetic::base_form(reading);
        let syllable = self.remaps.get(&base).map_or(base.as_str(), String::as_str);

        if let Some(code) = self.syllables.get(syllable) {
            return Ok(code.clone());
        }

        let (lead, final_part) = match self.split_initial(syllable) {
            Some((initial_code, rest)) => (Some(initial_code), rest),
            None => (syllable.chars().next(), syllable),
        };

        match (lead, self.finals.get(final_part)) {
            (Some(lead), Some(&final_code)) => Ok([lead, final_code].iter().collect()),
            _ => Err(EncodeError {
                reading: reading.to_string(),
                base: base.clone(),
                final_part: final_part.to_string(),
            }),
        }
    }

    fn split_initial<'a>(&self, syllable: &'a str) -> Option<(char, &'a str)> {
        self.initials.iter().find_map(|(cluster, code)| {
            syllable
                .strip_prefix(cluster.as_str())
                .map(|rest| (*code, rest))
        })
    }
}
