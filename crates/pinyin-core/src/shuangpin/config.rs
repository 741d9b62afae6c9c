use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Deserialize)]
struct SchemeConfig {
    #[serde(default)]
    remaps: BTreeMap<String, String>,
    #[serde(default)]
    syllables: BTreeMap<String, String>,
    initials: BTreeMap<String, String>,
    finals: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SchemeConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[{0}] table is empty")]
    Empty(&'static str),
    #[error("[{table}] non-ASCII or empty key: {key:?}")]
    InvalidKey { table: &'static str, key: String },
    #[error("[{table}] {key}: code must be exactly {expected} character(s), got {value:?}")]
    CodeWidth {
        table: &'static str,
        key: String,
        value: String,
        expected: usize,
    },
    #[error("[remaps] {0}: empty target")]
    EmptyRemap(String),
}

/// Validated scheme tables, still keyed by syllable text.
pub(super) struct SchemeTables {
    pub remaps: BTreeMap<String, String>,
    pub syllables: BTreeMap<String, String>,
    pub initials: BTreeMap<String, char>,
    pub finals: BTreeMap<String, char>,
}

pub(super) fn parse_tables(toml_str: &str) -> Result<SchemeTables, SchemeConfigError> {
    let config: SchemeConfig =
        toml::from_str(toml_str).map_err(|e| SchemeConfigError::Parse(e.to_string()))?;

    if config.initials.is_empty() {
        return Err(SchemeConfigError::Empty("initials"));
    }
    if config.finals.is_empty() {
        return Err(SchemeConfigError::Empty("finals"));
    }

    for (key, target) in &config.remaps {
        check_key("remaps", key)?;
        if target.is_empty() {
            return Err(SchemeConfigError::EmptyRemap(key.clone()));
        }
    }
    for (key, code) in &config.syllables {
        check_key("syllables", key)?;
        check_width("syllables", key, code, 2)?;
    }

    Ok(SchemeTables {
        remaps: config.remaps,
        syllables: config.syllables,
        initials: single_char_table("initials", config.initials)?,
        finals: single_char_table("finals", config.finals)?,
    })
}

fn single_char_table(
    table: &'static str,
    raw: BTreeMap<String, String>,
) -> Result<BTreeMap<String, char>, SchemeConfigError> {
    raw.into_iter()
        .map(|(key, code)| {
            check_key(table, &key)?;
            check_width(table, &key, &code, 1)?;
            let c = code.chars().next().ok_or(SchemeConfigError::CodeWidth {
                table,
                key: key.clone(),
                value: code.clone(),
                expected: 1,
            })?;
            Ok((key, c))
        })
        .collect()
}

fn check_key(table: &'static str, key: &str) -> Result<(), SchemeConfigError> {
    if key.is_empty() || !key.is_ascii() {
        return Err(SchemeConfigError::InvalidKey {
            table,
            key: key.to_string(),
        });
    }
    Ok(())
}

fn check_width(
    table: &'static str,
    key: &str,
    code: &str,
    expected: usize,
) -> Result<(), SchemeConfigError> {
    if code.chars().count() != expected {
        return Err(SchemeConfigError::CodeWidth {
            table,
            key: key.to_string(),
            value: code.to_string(),
            expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let tables = parse_tables(super::super::DEFAULT_XIAOHE_TOML).unwrap();
        assert_eq!(tables.initials.len(), 23);
        assert_eq!(tables.initials["zh"], 'v');
        assert_eq!(tables.finals["ong"], 's');
        assert_eq!(tables.syllables["er"], "er");
        assert_eq!(tables.remaps["hng"], "heng");
    }

    #[test]
    fn remaps_and_syllables_are_optional() {
        let toml = r#"
[initials]
b = "b"

[finals]
a = "a"
"#;
        let tables = parse_tables(toml).unwrap();
        assert!(tables.remaps.is_empty());
        assert!(tables.syllables.is_empty());
    }

    #[test]
    fn error_empty_initials() {
        let toml = "[initials]\n[finals]\na = \"a\"\n";
        let err = parse_tables(toml).err().unwrap();
        assert!(matches!(err, SchemeConfigError::Empty("initials")));
    }

    #[test]
    fn error_wide_final_code() {
        let toml = r#"
[initials]
b = "b"

[finals]
ang = "ah"
"#;
        let err = parse_tables(toml).err().unwrap();
        assert!(matches!(
            err,
            SchemeConfigError::CodeWidth { expected: 1, .. }
        ));
        assert!(err.to_string().contains("ang"));
    }

    #[test]
    fn error_narrow_syllable_code() {
        let toml = r#"
[syllables]
a = "a"

[initials]
b = "b"

[finals]
a = "a"
"#;
        let err = parse_tables(toml).err().unwrap();
        assert!(matches!(
            err,
            SchemeConfigError::CodeWidth { expected: 2, .. }
        ));
    }

    #[test]
    fn error_non_ascii_key() {
        let toml = r#"
[initials]
"ㄅ" = "b"

[finals]
a = "a"
"#;
        let err = parse_tables(toml).err().unwrap();
        assert!(matches!(err, SchemeConfigError::InvalidKey { .. }));
    }

    #[test]
    fn error_empty_remap() {
        let toml = r#"
[remaps]
hng = ""

[initials]
b = "b"

[finals]
a = "a"
"#;
        let err = parse_tables(toml).err().unwrap();
        assert!(matches!(err, SchemeConfigError::EmptyRemap(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_tables("not valid toml {{{").err().unwrap();
        assert!(matches!(err, SchemeConfigError::Parse(_)));
    }
}
