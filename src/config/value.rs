// file: src/config/value.rs
// version: 1.0.0
// guid: 8d2b6e41-0c3a-4f9e-b5d7-61a4e2c9f803

//! Typed configuration values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a declared symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Bool,
    Int,
    String,
}

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl ConfigValue {
    pub fn kind(&self) -> SymbolKind {
        match self {
            ConfigValue::Bool(_) => SymbolKind::Bool,
            ConfigValue::Int(_) => SymbolKind::Int,
            ConfigValue::String(_) => SymbolKind::String,
        }
    }

    /// Truthiness used by boolean lookups.
    ///
    /// Integers come from non-empty text in the persisted form, so they are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => *b,
            ConfigValue::Int(_) => true,
            ConfigValue::String(s) => !s.is_empty(),
        }
    }

    /// Decode an unquoted literal: `y`/`n`, a decimal integer, or raw text.
    ///
    /// Only canonical integers become `Int`; `007` or `-0` keep their text.
    pub fn from_literal(raw: &str) -> Self {
        match raw {
            "y" => ConfigValue::Bool(true),
            "n" => ConfigValue::Bool(false),
            _ => canonical_int(raw)
                .map(ConfigValue::Int)
                .unwrap_or_else(|| ConfigValue::String(raw.to_string())),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(true) => f.write_str("True"),
            ConfigValue::Bool(false) => f.write_str("False"),
            ConfigValue::Int(n) => write!(f, "{}", n),
            ConfigValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

/// Integer whose decimal rendering is exactly `raw`
pub(crate) fn canonical_int(raw: &str) -> Option<i64> {
    if !is_integer_literal(raw) {
        return None;
    }
    raw.parse::<i64>().ok().filter(|n| n.to_string() == raw)
}

pub(crate) fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_literal() {
        assert_eq!(ConfigValue::from_literal("y"), ConfigValue::Bool(true));
        assert_eq!(ConfigValue::from_literal("n"), ConfigValue::Bool(false));
        assert_eq!(ConfigValue::from_literal("42"), ConfigValue::Int(42));
        assert_eq!(ConfigValue::from_literal("-1"), ConfigValue::Int(-1));
        assert_eq!(ConfigValue::from_literal("1G"), ConfigValue::from("1G"));
        assert_eq!(ConfigValue::from_literal("+5"), ConfigValue::from("+5"));
    }

    #[test]
    fn test_leading_zeros_stay_text() {
        assert_eq!(ConfigValue::from_literal("007"), ConfigValue::from("007"));
        assert_eq!(ConfigValue::from_literal("-0"), ConfigValue::from("-0"));
        assert_eq!(ConfigValue::from_literal("0"), ConfigValue::Int(0));
    }

    #[test]
    fn test_overflowing_integer_stays_text() {
        let raw = "99999999999999999999999";
        assert_eq!(ConfigValue::from_literal(raw), ConfigValue::from(raw));
    }

    #[test]
    fn test_display_capitalizes_booleans() {
        assert_eq!(ConfigValue::Bool(true).to_string(), "True");
        assert_eq!(ConfigValue::Bool(false).to_string(), "False");
        assert_eq!(ConfigValue::Int(7).to_string(), "7");
    }

    #[test]
    fn test_truthiness() {
        assert!(ConfigValue::Bool(true).is_truthy());
        assert!(!ConfigValue::Bool(false).is_truthy());
        assert!(ConfigValue::Int(0).is_truthy());
        assert!(!ConfigValue::from("").is_truthy());
        assert!(ConfigValue::from("0").is_truthy());
    }
}
