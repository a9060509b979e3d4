// file: src/config/schema.rs
// version: 1.0.0
// guid: c41e8b27-9f65-4a3d-b0e2-7d58a1c6f934

//! Kconfig schema scanning
//!
//! Only the subset used by the image configuration is modeled: `config` blocks with a
//! `default` line and `choice` blocks with a `default SYMBOL` line. `menu`/`endmenu` and
//! `endchoice` act as block boundaries and nothing more.

use super::store::ConfigStore;
use super::value::{canonical_int, ConfigValue, SymbolKind};
use crate::error::{MkqnxError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

struct Patterns {
    config: Regex,
    choice: Regex,
    endchoice: Regex,
    boundary: Regex,
    default: Regex,
    choice_default: Regex,
    trailing_comment: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        config: Regex::new(r"^config\s+([A-Za-z0-9_]+)").expect("valid config regex"),
        choice: Regex::new(r"^choice\b").expect("valid choice regex"),
        endchoice: Regex::new(r"^endchoice\b").expect("valid endchoice regex"),
        boundary: Regex::new(r"^(config|choice|menu|endmenu|endchoice)\b").expect("valid boundary regex"),
        default: Regex::new(r"^default\s+(.*)$").expect("valid default regex"),
        choice_default: Regex::new(r"^default\s+([A-Za-z0-9_]+)").expect("valid choice default regex"),
        trailing_comment: Regex::new(r"\s*#.*$").expect("valid comment regex"),
    })
}

/// A declared configuration symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDecl {
    pub name: String,
    pub kind: SymbolKind,
    pub default: ConfigValue,
}

impl SymbolDecl {
    pub fn new(name: impl Into<String>, default: ConfigValue) -> Self {
        Self {
            name: name.into(),
            kind: default.kind(),
            default,
        }
    }
}

/// A `choice` block: its member symbols and the declared default member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub members: Vec<String>,
    pub default: Option<String>,
}

/// Symbol declarations and choice groups scanned from a Kconfig file
#[derive(Debug, Clone, Default)]
pub struct SchemaModel {
    symbols: BTreeMap<String, SymbolDecl>,
    choices: Vec<ChoiceGroup>,
}

impl SchemaModel {
    /// Load and scan a Kconfig file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MkqnxError::SchemaNotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        let model = Self::parse(&text);
        debug!(
            "Scanned {} symbols and {} choice groups from {}",
            model.symbols.len(),
            model.choices.len(),
            path.display()
        );
        Ok(model)
    }

    /// Scan schema text line by line
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let pats = patterns();
        let mut model = Self::default();

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim();

            if let Some(caps) = pats.config.captures(line) {
                let name = caps[1].to_string();
                let (default, next) = scan_config_block(&lines, i + 1);
                if let Some(raw) = default {
                    model
                        .symbols
                        .insert(name.clone(), SymbolDecl::new(name, classify_default(&raw)));
                }
                i = next;
                continue;
            }

            if pats.choice.is_match(line) {
                let (group, next) = scan_choice_block(&lines, i + 1);
                model.choices.push(group);
                i = next;
                continue;
            }

            i += 1;
        }

        model.force_choice_defaults();
        model
    }

    /// Choice defaults are always active booleans, whatever their declaration says
    fn force_choice_defaults(&mut self) {
        for chosen in self.choices.iter().filter_map(|c| c.default.as_ref()) {
            let forced = match self.symbols.get(chosen) {
                Some(decl) => decl.default != ConfigValue::Bool(true),
                None => true,
            };
            if forced {
                debug!("Forcing choice default {} to y", chosen);
                self.symbols
                    .insert(chosen.clone(), SymbolDecl::new(chosen.clone(), ConfigValue::Bool(true)));
            }
        }
    }

    pub fn symbol(&self, name: &str) -> Option<&SymbolDecl> {
        self.symbols.get(name)
    }

    pub fn choices(&self) -> &[ChoiceGroup] {
        &self.choices
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Default configuration mapping for every declared symbol
    pub fn default_config(&self) -> ConfigStore {
        self.symbols
            .values()
            .map(|decl| (decl.name.clone(), decl.default.clone()))
            .collect()
    }
}

/// Find the first `default` line of a config block; returns it and the resume index
fn scan_config_block(lines: &[&str], start: usize) -> (Option<String>, usize) {
    let pats = patterns();
    let mut j = start;

    while j < lines.len() {
        let line = lines[j].trim();
        if pats.boundary.is_match(line) {
            return (None, j);
        }
        if let Some(caps) = pats.default.captures(line) {
            let raw = pats.trailing_comment.replace(caps[1].trim(), "");
            return (Some(raw.trim().to_string()), j);
        }
        j += 1;
    }

    (None, j)
}

/// Collect a choice block up to `endchoice`; returns the group and the index after it
fn scan_choice_block(lines: &[&str], start: usize) -> (ChoiceGroup, usize) {
    let pats = patterns();
    let mut group = ChoiceGroup::default();
    let mut j = start;

    while j < lines.len() {
        let line = lines[j].trim();
        if pats.endchoice.is_match(line) {
            return (group, j + 1);
        }
        if let Some(caps) = pats.config.captures(line) {
            group.members.push(caps[1].to_string());
        } else if group.default.is_none() {
            if let Some(caps) = pats.choice_default.captures(line) {
                group.default = Some(caps[1].to_string());
            }
        }
        j += 1;
    }

    (group, j)
}

/// Classify a raw default literal by its shape
fn classify_default(raw: &str) -> ConfigValue {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return ConfigValue::String(raw[1..raw.len() - 1].to_string());
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(n) = canonical_int(raw) {
            return ConfigValue::Int(n);
        }
    }
    match raw {
        "y" => ConfigValue::Bool(true),
        "n" => ConfigValue::Bool(false),
        _ => ConfigValue::String(raw.trim_matches('"').to_string()),
    }
}
