// file: src/config/store.rs
// version: 1.0.0
// guid: 5a7e0c93-21d4-4b8f-8e6a-d39f17b2c4e6

//! Flat `CONFIG_<NAME>=<value>` configuration store
//!
//! The store is sparse: an absent key means "use the documented fallback" and boolean
//! false is normally represented by absence.

use super::value::ConfigValue;
use crate::error::{MkqnxError, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Literal prefix of every persisted symbol
pub const CONFIG_PREFIX: &str = "CONFIG_";

fn line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^CONFIG_([A-Za-z0-9_]+)=(.*)$").expect("valid config line regex"))
}

/// Typed key/value mapping parsed from or rendered to a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigStore {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config text; lines that are not `CONFIG_<NAME>=<value>` are ignored
    pub fn parse(text: &str) -> Self {
        let mut values = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some(caps) = line_regex().captures(line) else {
                debug!("Ignoring unrecognized config line: {}", line);
                continue;
            };

            let key = caps[1].to_string();
            let value = decode_value(caps[2].trim());
            values.insert(key, value);
        }

        Self { values }
    }

    /// Read and parse a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MkqnxError::ConfigNotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        let store = Self::parse(&text);
        debug!("Loaded {} entries from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.values.iter()
    }

    /// Absent or falsy values read as false
    pub fn get_bool(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(ConfigValue::is_truthy)
    }

    /// String form of a value, or `fallback` when absent.
    ///
    /// Booleans render as `True`/`False`; use [`ConfigStore::get_bool`] for boolean fields.
    pub fn get_string(&self, key: &str, fallback: &str) -> String {
        match self.values.get(key) {
            Some(value) => value.to_string(),
            None => fallback.to_string(),
        }
    }

    /// Integer value, or `fallback` when absent; non-numeric text is an error
    pub fn get_int(&self, key: &str, fallback: i64) -> Result<i64> {
        match self.values.get(key) {
            Some(ConfigValue::Int(n)) => Ok(*n),
            Some(other) => {
                let text = other.to_string();
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| MkqnxError::parse(key, text))
            }
            None => Ok(fallback),
        }
    }

    /// Render persisted lines in key order; false booleans and empty strings are omitted
    pub fn render_lines(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(|(key, value)| render_entry(key, value))
            .collect()
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigStore {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn decode_value(raw: &str) -> ConfigValue {
    let quoted = (raw.starts_with('"') && raw.ends_with('"'))
        || (raw.starts_with('\'') && raw.ends_with('\''));

    if quoted {
        // a lone quote character decodes to the empty string
        let inner = raw.get(1..raw.len() - 1).unwrap_or("");
        return ConfigValue::String(inner.to_string());
    }

    ConfigValue::from_literal(raw)
}

/// Render one `CONFIG_` line, or nothing for falsy values
pub fn render_entry(key: &str, value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Bool(true) => Some(format!("{CONFIG_PREFIX}{key}=y")),
        ConfigValue::Bool(false) => None,
        ConfigValue::Int(n) => Some(format!("{CONFIG_PREFIX}{key}={n}")),
        ConfigValue::String(s) if s.is_empty() => None,
        ConfigValue::String(s) => Some(format!("{CONFIG_PREFIX}{key}=\"{s}\"")),
    }
}

/// Replace the first `CONFIG_<key>=` line with `new_line`, or append it.
///
/// All other lines pass through untouched and in order.
pub fn patch_single_key(existing: &[String], key: &str, new_line: &str) -> Vec<String> {
    let marker = format!("{CONFIG_PREFIX}{key}=");
    let mut replaced = false;

    let mut out: Vec<String> = existing
        .iter()
        .map(|line| {
            if !replaced && line.trim_start().starts_with(&marker) {
                replaced = true;
                new_line.to_string()
            } else {
                line.clone()
            }
        })
        .collect();

    if !replaced {
        out.push(new_line.to_string());
    }

    out
}

/// Read a file as lines; a missing file yields no lines
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}

/// Write lines with a trailing newline
pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
# Automatically generated
CONFIG_MKQNX_ARCH_X86_64=y
CONFIG_MKQNX_VERBOSE=n
CONFIG_MKQNX_CPU=2
CONFIG_MKQNX_RAM="1G"
CONFIG_MKQNX_TZ='Europe/Berlin'
CONFIG_MKQNX_HOSTNAME=qnxhost
not a config line
   CONFIG_MKQNX_NOPROMPT=y
CONFIG_bad-key=y
"#;

    #[test]
    fn test_parse_decodes_values() {
        let store = ConfigStore::parse(SAMPLE);

        assert_eq!(store.get("MKQNX_ARCH_X86_64"), Some(&ConfigValue::Bool(true)));
        assert_eq!(store.get("MKQNX_VERBOSE"), Some(&ConfigValue::Bool(false)));
        assert_eq!(store.get("MKQNX_CPU"), Some(&ConfigValue::Int(2)));
        assert_eq!(store.get("MKQNX_RAM"), Some(&ConfigValue::from("1G")));
        assert_eq!(store.get("MKQNX_TZ"), Some(&ConfigValue::from("Europe/Berlin")));
        assert_eq!(store.get("MKQNX_HOSTNAME"), Some(&ConfigValue::from("qnxhost")));
        assert!(store.get_bool("MKQNX_NOPROMPT"));
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_parse_lone_quote_is_empty_string() {
        let store = ConfigStore::parse("CONFIG_A=\"\nCONFIG_B=\"\"");
        assert_eq!(store.get("A"), Some(&ConfigValue::from("")));
        assert_eq!(store.get("B"), Some(&ConfigValue::from("")));
    }

    #[test]
    fn test_parse_malformed_file_yields_nothing() {
        let store = ConfigStore::parse("garbage\n=y\nCONFIG_=1\n");
        assert!(store.is_empty());
    }

    #[test]
    fn test_absent_bool_is_false() {
        let store = ConfigStore::parse(SAMPLE);
        assert!(!store.get_bool("MKQNX_DOES_NOT_EXIST"));
        assert!(!store.get_bool("MKQNX_VERBOSE"));
        assert!(!ConfigStore::new().get_bool("MKQNX_USB"));
    }

    #[test]
    fn test_get_string() {
        let store = ConfigStore::parse(SAMPLE);
        assert_eq!(store.get_string("MKQNX_RAM", "512M"), "1G");
        assert_eq!(store.get_string("MKQNX_MISSING", "dhcp"), "dhcp");
        assert_eq!(store.get_string("MKQNX_CPU", "0"), "2");
        assert_eq!(store.get_string("MKQNX_NOPROMPT", ""), "True");
    }

    #[test]
    fn test_leading_zeros_survive_parse_and_render() {
        let store = ConfigStore::parse("CONFIG_MKQNX_HOSTNAME=007\nCONFIG_MKQNX_BOOT_SIZE=064\n");
        assert_eq!(store.get_string("MKQNX_HOSTNAME", ""), "007");
        assert_eq!(store.get_int("MKQNX_BOOT_SIZE", 0).unwrap(), 64);
        assert_eq!(
            ConfigStore::parse(&store.render_lines().join("\n")).get_string("MKQNX_HOSTNAME", ""),
            "007"
        );
    }

    #[test]
    fn test_get_int() {
        let store = ConfigStore::parse("CONFIG_A=12\nCONFIG_B=\"7\"\nCONFIG_C=abc\n");
        assert_eq!(store.get_int("A", 0).unwrap(), 12);
        assert_eq!(store.get_int("B", 0).unwrap(), 7);
        assert_eq!(store.get_int("MISSING", 5).unwrap(), 5);

        let err = store.get_int("C", 0).unwrap_err();
        assert!(matches!(err, MkqnxError::ParseError { ref key, .. } if key == "C"));
    }

    #[test]
    fn test_render_lines() {
        let mut store = ConfigStore::new();
        store.insert("B_ON", true);
        store.insert("A_OFF", false);
        store.insert("C_INT", 4_i64);
        store.insert("D_STR", "1G");
        store.insert("E_EMPTY", "");

        assert_eq!(
            store.render_lines(),
            vec![
                "CONFIG_B_ON=y".to_string(),
                "CONFIG_C_INT=4".to_string(),
                "CONFIG_D_STR=\"1G\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_then_parse_drops_only_falsy_entries() {
        let mut store = ConfigStore::new();
        store.insert("ON", true);
        store.insert("OFF", false);
        store.insert("COUNT", 3_i64);
        store.insert("NAME", "qnx");
        store.insert("EMPTY", "");

        let reparsed = ConfigStore::parse(&store.render_lines().join("\n"));

        let mut expected = store.clone();
        expected.remove("OFF");
        expected.remove("EMPTY");
        assert_eq!(reparsed, expected);
        assert_ne!(reparsed, store);
    }

    #[test]
    fn test_patch_single_key_replaces_first_match() {
        let lines: Vec<String> = vec![
            "# header".into(),
            "CONFIG_MKQNX_CPU=2".into(),
            "CONFIG_MKQNX_USERS=\"old\"".into(),
            "".into(),
            "CONFIG_MKQNX_USERS=\"dup\"".into(),
        ];

        let out = patch_single_key(&lines, "MKQNX_USERS", "CONFIG_MKQNX_USERS=\"new\"");
        assert_eq!(
            out,
            vec![
                "# header".to_string(),
                "CONFIG_MKQNX_CPU=2".to_string(),
                "CONFIG_MKQNX_USERS=\"new\"".to_string(),
                "".to_string(),
                "CONFIG_MKQNX_USERS=\"dup\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_patch_single_key_appends_when_missing() {
        let lines: Vec<String> = vec!["CONFIG_MKQNX_CPU=2".into()];
        let out = patch_single_key(&lines, "MKQNX_USERS", "CONFIG_MKQNX_USERS=\"a\"");
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], "CONFIG_MKQNX_USERS=\"a\"");
    }

    #[test]
    fn test_patch_single_key_does_not_match_prefixed_names() {
        let lines: Vec<String> = vec!["CONFIG_MKQNX_USERS_EXTRA=y".into()];
        let out = patch_single_key(&lines, "MKQNX_USERS", "CONFIG_MKQNX_USERS=\"a\"");
        assert_eq!(out, vec!["CONFIG_MKQNX_USERS_EXTRA=y".to_string(), "CONFIG_MKQNX_USERS=\"a\"".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigStore::load("/nonexistent/.config");
        assert!(matches!(result, Err(MkqnxError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_and_write_lines() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "CONFIG_MKQNX_GRAPHICS=y")?;

        let store = ConfigStore::load(file.path())?;
        assert!(store.get_bool("MKQNX_GRAPHICS"));

        let lines = read_lines(file.path())?;
        write_lines(file.path(), &patch_single_key(&lines, "MKQNX_SLM", "CONFIG_MKQNX_SLM=y"))?;

        let text = fs::read_to_string(file.path())?;
        assert_eq!(text, "CONFIG_MKQNX_GRAPHICS=y\nCONFIG_MKQNX_SLM=y\n");
        Ok(())
    }
}
