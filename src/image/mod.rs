// file: src/image/mod.rs
// version: 2.0.0
// guid: a1b2c3d4-e5f6-7890-1234-567890abcdef

//! Image building through mkqnximage
//!
//! This module handles:
//! - Translation of a validated configuration into mkqnximage arguments
//! - Locating and running the mkqnximage executable

pub mod args;
pub mod runner;

pub use args::{ArgumentTranslator, Rule, MKQNX_RULES};
pub use runner::{shell_join, ImageTool, MKQNX_TOOL};

use crate::config::{ConfigStore, ConfigValidator, ValidationWarning};
use crate::Result;

/// Arguments for a loaded config, after translation-time validation
pub fn build_arguments(config: &ConfigStore) -> Result<(Vec<String>, Vec<ValidationWarning>)> {
    let (validated, warnings) = ConfigValidator::translation().validated(config);
    let args = ArgumentTranslator::new().translate(&validated)?;
    Ok((args, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_arguments_validates_first() {
        let config = ConfigStore::parse("CONFIG_MKQNX_CPU=8\nCONFIG_MKQNX_RAM=\"512\"\n");
        let (args, warnings) = build_arguments(&config).unwrap();

        assert_eq!(warnings.len(), 2);
        assert!(!args.iter().any(|a| a.starts_with("--cpu") || a.starts_with("--ram")));
    }

    #[test]
    fn test_build_arguments_cpu_text_is_reset_not_fatal() {
        let config = ConfigStore::parse("CONFIG_MKQNX_CPU=abc\n");
        let (args, warnings) = build_arguments(&config).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(!args.iter().any(|a| a.starts_with("--cpu")));
    }
}
