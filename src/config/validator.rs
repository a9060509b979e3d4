// file: src/config/validator.rs
// version: 1.0.0
// guid: e5f6a7b8-c9d0-4e12-8a34-5b6c7d8e9f01

//! Normalization of known fields
//!
//! Corrections never fail: a bad value is replaced and a warning is logged and returned.

use super::store::ConfigStore;
use super::value::ConfigValue;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::sync::OnceLock;
use tracing::warn;

pub const CPU_KEY: &str = "MKQNX_CPU";
pub const RAM_KEY: &str = "MKQNX_RAM";

pub const CPU_MIN: i64 = 1;
pub const CPU_MAX: i64 = 4;
pub const CPU_FALLBACK: i64 = 2;
pub const RAM_FALLBACK: &str = "1G";

/// Where the configuration being validated came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    /// Defaults produced from the schema; bare RAM numbers get an `M` unit
    Generation,
    /// A loaded config about to be translated; RAM must carry a unit
    Translation,
}

/// A correction applied to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub key: String,
    pub original: String,
    pub replacement: String,
    pub reason: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} value '{}' {}; resetting to '{}'",
            self.key, self.original, self.reason, self.replacement
        )
    }
}

fn ram_with_optional_unit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"^[1-9][0-9]*([MG])?$")
            .case_insensitive(true)
            .build()
            .expect("valid RAM regex")
    })
}

fn ram_with_unit() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        RegexBuilder::new(r"^[1-9][0-9]*[MG]$")
            .case_insensitive(true)
            .build()
            .expect("valid RAM regex")
    })
}

/// Field validator for one phase
#[derive(Debug, Clone, Copy)]
pub struct ConfigValidator {
    phase: ValidationPhase,
}

impl ConfigValidator {
    pub fn new(phase: ValidationPhase) -> Self {
        Self { phase }
    }

    /// Validator for schema-generated defaults
    pub fn generation() -> Self {
        Self::new(ValidationPhase::Generation)
    }

    /// Validator for a loaded config before translation
    pub fn translation() -> Self {
        Self::new(ValidationPhase::Translation)
    }

    /// Normalize known fields in place and report every correction
    pub fn normalize(&self, config: &mut ConfigStore) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Some(value) = config.get(CPU_KEY) {
            let (cpu, warning) = check_cpu(value);
            config.insert(CPU_KEY, cpu);
            warnings.extend(warning);
        }

        if let Some(value) = config.get(RAM_KEY) {
            let (ram, warning) = match self.phase {
                ValidationPhase::Generation => check_ram_generation(value),
                ValidationPhase::Translation => check_ram_translation(value),
            };
            config.insert(RAM_KEY, ram);
            warnings.extend(warning);
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        warnings
    }

    /// Copying variant of [`ConfigValidator::normalize`]
    pub fn validated(&self, config: &ConfigStore) -> (ConfigStore, Vec<ValidationWarning>) {
        let mut copy = config.clone();
        let warnings = self.normalize(&mut copy);
        (copy, warnings)
    }
}

/// CPU count must be an integer in 1..=4
pub fn check_cpu(value: &ConfigValue) -> (i64, Option<ValidationWarning>) {
    let text = value.to_string();
    let parsed = match value {
        ConfigValue::Int(n) => Some(*n),
        ConfigValue::String(s) => s.trim().parse::<i64>().ok(),
        ConfigValue::Bool(_) => None,
    };

    match parsed {
        Some(n) if (CPU_MIN..=CPU_MAX).contains(&n) => (n, None),
        Some(_) => (
            CPU_FALLBACK,
            Some(cpu_warning(text, format!("out of range {}..{}", CPU_MIN, CPU_MAX))),
        ),
        None => (CPU_FALLBACK, Some(cpu_warning(text, "is not an integer".to_string()))),
    }
}

fn cpu_warning(original: String, reason: String) -> ValidationWarning {
    ValidationWarning {
        key: CPU_KEY.to_string(),
        original,
        replacement: CPU_FALLBACK.to_string(),
        reason,
    }
}

/// Generation rule: `<digits>[M|G]`, bare digits get `M` appended
pub fn check_ram_generation(value: &ConfigValue) -> (String, Option<ValidationWarning>) {
    let text = value.to_string();

    if !ram_with_optional_unit().is_match(&text) {
        return (RAM_FALLBACK.to_string(), Some(ram_warning(text)));
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return (format!("{}M", text), None);
    }

    (text, None)
}

/// Translation rule: `<digits>M` or `<digits>G` only, anything else resets
pub fn check_ram_translation(value: &ConfigValue) -> (String, Option<ValidationWarning>) {
    let text = value.to_string();

    if ram_with_unit().is_match(&text) {
        (text, None)
    } else {
        (RAM_FALLBACK.to_string(), Some(ram_warning(text)))
    }
}

fn ram_warning(original: String) -> ValidationWarning {
    ValidationWarning {
        key: RAM_KEY.to_string(),
        original,
        replacement: RAM_FALLBACK.to_string(),
        reason: "not in format <digits>[M|G]".to_string(),
    }
}
