//! Unicode scalar values keyed in `U+XXXX` notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A Unicode scalar value. Surrogates and values above U+10FFFF are rejected
/// at construction, so `as_char` never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Codepoint(u32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodepointError {
    #[error("missing U+ prefix: {0:?}")]
    MissingPrefix(String),
    #[error("invalid hex digits: {0:?}")]
    InvalidHex(String),
    #[error("not a Unicode scalar value: U+{0:X}")]
    NotScalar(u32),
}

impl Codepoint {
    pub fn new(value: u32) -> Result<Self, CodepointError> {
        char::from_u32(value)
            .map(Self::from)
            .ok_or(CodepointError::NotScalar(value))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn as_char(self) -> char {
        // Checked in `new` / `From<char>`.
        char::from_u32(self.0).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl From<char> for Codepoint {
    fn from(c: char) -> Self {
        Self(c as u32)
    }
}

impl From<Codepoint> for u32 {
    fn from(cp: Codepoint) -> Self {
        cp.0
    }
}

impl TryFrom<u32> for Codepoint {
    type Error = CodepointError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Codepoint {
    type Err = CodepointError;

    /// Parse `U+4E2D` (case-insensitive prefix, 1-6 hex digits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hex = s
            .strip_prefix("U+")
            .or_else(|| s.strip_prefix("u+"))
            .ok_or_else(|| CodepointError::MissingPrefix(s.to_string()))?;
        if hex.is_empty() || hex.len() > 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodepointError::InvalidHex(s.to_string()));
        }
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| CodepointError::InvalidHex(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Display for Codepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let cp: Codepoint = "U+4E2D".parse().unwrap();
        assert_eq!(cp.as_char(), '中');
        assert_eq!(cp.to_string(), "U+4E2D");

        let ext_b: Codepoint = "U+20000".parse().unwrap();
        assert_eq!(ext_b.value(), 0x20000);
        assert_eq!(ext_b.to_string(), "U+20000");

        let short: Codepoint = "U+3007".parse().unwrap();
        assert_eq!(short.as_char(), '〇');
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "4E2D".parse::<Codepoint>(),
            Err(CodepointError::MissingPrefix(_))
        ));
        assert!(matches!(
            "U+XYZ".parse::<Codepoint>(),
            Err(CodepointError::InvalidHex(_))
        ));
        assert!(matches!(
            "U+".parse::<Codepoint>(),
            Err(CodepointError::InvalidHex(_))
        ));
        assert!(matches!(
            "U+D800".parse::<Codepoint>(),
            Err(CodepointError::NotScalar(0xD800))
        ));
        assert!(matches!(
            "U+110000".parse::<Codepoint>(),
            Err(CodepointError::NotScalar(0x110000))
        ));
    }

    #[test]
    fn ordering_follows_value() {
        let a = Codepoint::from('〇');
        let b = Codepoint::from('中');
        let c = Codepoint::from('𠀀');
        assert!(a < b && b < c);
    }
}
