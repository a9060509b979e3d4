// file: src/config/mod.rs
// version: 2.0.0
// guid: a1b2c3d4-e5f6-7a8b-9c0d-1e2f3a4b5c6d

//! Configuration module for the mkqnximage front end
//!
//! Handles the Kconfig schema, the flat `.config` store and normalization of known fields.

pub mod schema;
pub mod store;
pub mod validator;
pub mod value;

pub use schema::{ChoiceGroup, SchemaModel, SymbolDecl};
pub use store::{patch_single_key, read_lines, write_lines, ConfigStore, CONFIG_PREFIX};
pub use validator::{ConfigValidator, ValidationPhase, ValidationWarning};
pub use value::{ConfigValue, SymbolKind};

use crate::Result;
use std::path::Path;
use tracing::info;

/// Default schema file name
pub const DEFAULT_KCONFIG: &str = "Kconfig";

/// Default persisted config file name
pub const DEFAULT_CONFIG: &str = ".config";

/// Scan a schema and produce validated defaults
pub fn generate_defaults<P: AsRef<Path>>(kconfig: P) -> Result<(ConfigStore, Vec<ValidationWarning>)> {
    let model = SchemaModel::load(kconfig)?;
    let mut defaults = model.default_config();
    let warnings = ConfigValidator::generation().normalize(&mut defaults);
    Ok((defaults, warnings))
}

/// Render a default config file body with its header
pub fn render_default_config(kconfig: &Path, config: &ConfigStore) -> Vec<String> {
    let mut lines = vec![
        format!("# Automatically generated default .config from {}", kconfig.display()),
        "# Regenerate with `mkqnx-config defconfig`".to_string(),
        String::new(),
    ];
    lines.extend(config.render_lines());
    lines
}

/// Generate defaults from `kconfig` and write them to `output`
pub fn write_default_config(kconfig: &Path, output: &Path) -> Result<ConfigStore> {
    let (defaults, _warnings) = generate_defaults(kconfig)?;
    store::write_lines(output, &render_default_config(kconfig, &defaults))?;
    info!("Wrote {} symbols to {}", defaults.len(), output.display());
    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KCONFIG: &str = r#"
choice
    default MKQNX_TYPE_QEMU
config MKQNX_TYPE_QEMU
    bool "qemu"
config MKQNX_TYPE_VMWARE
    bool "vmware"
endchoice

config MKQNX_CPU
    int "cpus"
    default 7

config MKQNX_RAM
    string "ram"
    default "512"

config MKQNX_VERBOSE
    bool "verbose"
    default n

config MKQNX_HOSTNAME
    string "hostname"
    default ""
"#;

    #[test]
    fn test_write_default_config() -> Result<()> {
        let dir = TempDir::new()?;
        let kconfig = dir.path().join("Kconfig");
        let output = dir.path().join(".config");
        std::fs::write(&kconfig, KCONFIG)?;

        let defaults = write_default_config(&kconfig, &output)?;
        assert_eq!(defaults.get("MKQNX_CPU"), Some(&ConfigValue::Int(2)));

        let text = std::fs::read_to_string(&output)?;
        let body: Vec<&str> = text.lines().skip(3).collect();
        assert_eq!(
            body,
            vec![
                "CONFIG_MKQNX_CPU=2",
                "CONFIG_MKQNX_RAM=\"512M\"",
                "CONFIG_MKQNX_TYPE_QEMU=y",
            ]
        );
        assert!(text.starts_with("# Automatically generated default .config from "));
        Ok(())
    }

    #[test]
    fn test_generate_defaults_reports_warnings() -> Result<()> {
        let dir = TempDir::new()?;
        let kconfig = dir.path().join("Kconfig");
        std::fs::write(&kconfig, KCONFIG)?;

        let (_, warnings) = generate_defaults(&kconfig)?;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].key, "MKQNX_CPU");
        Ok(())
    }

    #[test]
    fn test_missing_kconfig_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = write_default_config(&dir.path().join("Kconfig"), &dir.path().join(".config"));
        assert!(matches!(result, Err(crate::MkqnxError::SchemaNotFound(_))));
        assert!(!dir.path().join(".config").exists());
    }
}
