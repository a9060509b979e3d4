// file: src/image/args.rs
// version: 1.0.0
// guid: 2b9d4f71-6e08-4c35-a1f2-93e7c0d5b8a6

//! Translation of a validated configuration into `mkqnximage` arguments
//!
//! The rule table is evaluated top to bottom and its order is the order of the emitted
//! arguments. Choice rules pick the first true option.

use crate::config::ConfigStore;
use crate::Result;
use tracing::debug;

/// Prefix shared by every mkqnximage symbol
pub const SYMBOL_PREFIX: &str = "MKQNX_";

/// One entry of the translation table
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Always emitted verbatim
    Always(&'static str),
    /// First true symbol selects a mode; emitted when it differs from `baseline`,
    /// or always when `emit_baseline` is set
    Choice {
        flag: &'static str,
        options: &'static [(&'static str, &'static str)],
        baseline: &'static str,
        emit_baseline: bool,
    },
    /// Bare argument when the symbol is true
    Switch { key: &'static str, arg: &'static str },
    /// `--flag=yes` when the symbol is true
    Enable { key: &'static str, flag: &'static str },
    /// `--flag=no` when the symbol is false or absent
    Disable { key: &'static str, flag: &'static str },
    /// `--flag=yes|no` only when the symbol is present at all
    Explicit { key: &'static str, flag: &'static str },
    /// `--flag=<value>` unless the value is empty or equals `fallback`
    Value {
        key: &'static str,
        flag: &'static str,
        fallback: &'static str,
    },
    /// `--flag=<n>` unless the integer equals `fallback`
    Int {
        key: &'static str,
        flag: &'static str,
        fallback: i64,
    },
    /// A preset symbol wins over a free-form value symbol
    PresetOrValue {
        flag: &'static str,
        preset_key: &'static str,
        preset: &'static str,
        value_key: &'static str,
        baseline: &'static str,
    },
    /// `--<kebab-name>=<n>` for `MKQNX_<NAME>` when strictly positive
    Count(&'static str),
    /// `--<lowercase-name>=yes` for `MKQNX_<NAME>` when true
    Package(&'static str),
}

/// Translation table for mkqnximage
pub const MKQNX_RULES: &[Rule] = &[
    Rule::Always("--force"),
    Rule::Choice {
        flag: "--arch",
        options: &[("MKQNX_ARCH_AARCH64LE", "aarch64le")],
        baseline: "x86_64",
        emit_baseline: true,
    },
    // Behavior
    Rule::Enable { key: "MKQNX_VERBOSE", flag: "--verbose" },
    Rule::Value { key: "MKQNX_ASSUMED_IP", flag: "--assumed-ip", fallback: "" },
    Rule::Switch { key: "MKQNX_CLEAN", arg: "--clean" },
    Rule::Switch { key: "MKQNX_NOPROMPT", arg: "--noprompt" },
    // Runtime
    Rule::Choice {
        flag: "--type",
        options: &[
            ("MKQNX_TYPE_VMWARE", "vmware"),
            ("MKQNX_TYPE_VBOX", "vbox"),
            ("MKQNX_TYPE_QVM", "qvm"),
        ],
        baseline: "qemu",
        emit_baseline: false,
    },
    Rule::Int { key: "MKQNX_CPU", flag: "--cpu", fallback: 2 },
    Rule::Value { key: "MKQNX_PROC", flag: "--proc", fallback: "" },
    Rule::Value { key: "MKQNX_RAM", flag: "--ram", fallback: "1G" },
    // Partitioning
    Rule::Value { key: "MKQNX_PART_SIZES", flag: "--part-sizes", fallback: "full" },
    Rule::Count("BOOT_SIZE"),
    Rule::Count("SYS_SIZE"),
    Rule::Count("SYS_INODES"),
    Rule::Count("DATA_SIZE"),
    Rule::Count("DATA_INODES"),
    // Filesystems and integrity
    Rule::Disable { key: "MKQNX_UNION", flag: "--union" },
    Rule::Choice {
        flag: "--qcfs",
        options: &[
            ("MKQNX_QCFS_LZ4HC", "lz4hc"),
            ("MKQNX_QCFS_ZSTD", "zstd"),
            ("MKQNX_QCFS_YES", "yes"),
        ],
        baseline: "no",
        emit_baseline: false,
    },
    Rule::Enable { key: "MKQNX_QTD", flag: "--qtd" },
    Rule::Enable { key: "MKQNX_QTSAFEFS", flag: "--qtsafefs" },
    Rule::Choice {
        flag: "--secure-data",
        options: &[
            ("MKQNX_SECURE_DATA_NOSUID", "nosuid"),
            ("MKQNX_SECURE_DATA_NOEXEC", "noexec"),
        ],
        baseline: "no",
        emit_baseline: false,
    },
    Rule::Enable { key: "MKQNX_PATHTRUST", flag: "--pathtrust" },
    Rule::PresetOrValue {
        flag: "--zoneinfo",
        preset_key: "MKQNX_ZONEINFO_YES",
        preset: "yes",
        value_key: "MKQNX_ZONEINFO_PATH",
        baseline: "no",
    },
    Rule::Value { key: "MKQNX_TZ", flag: "--tz", fallback: "UTC" },
    // Users and SSH
    Rule::Value { key: "MKQNX_USERS", flag: "--users", fallback: "" },
    Rule::Value { key: "MKQNX_SSH_IDENT", flag: "--ssh-ident", fallback: "prompt" },
    Rule::Explicit { key: "MKQNX_SSHD_PREGEN", flag: "--sshd-pregen" },
    // Networking
    Rule::Value { key: "MKQNX_IP", flag: "--ip", fallback: "dhcp" },
    Rule::Value { key: "MKQNX_HOSTNAME", flag: "--hostname", fallback: "" },
    Rule::Value { key: "MKQNX_MACADDR", flag: "--macaddr", fallback: "" },
    Rule::Value { key: "MKQNX_TIME_SERVERS", flag: "--time-servers", fallback: "pool.ntp.org" },
    // Repositories and extras
    Rule::Value { key: "MKQNX_REPOS", flag: "--repos", fallback: "" },
    Rule::Value { key: "MKQNX_EXTRA_DIRS", flag: "--extra-dirs", fallback: "" },
    // Security and TPM
    Rule::Disable { key: "MKQNX_ASLR", flag: "--aslr" },
    Rule::Enable { key: "MKQNX_SECURE_PROCFS", flag: "--secure-procfs" },
    Rule::Enable { key: "MKQNX_CERTICOM", flag: "--certicom" },
    Rule::Choice {
        flag: "--tcg",
        options: &[("MKQNX_TCG_CMDLINE", "cmdline"), ("MKQNX_TCG_YES", "yes")],
        baseline: "no",
        emit_baseline: false,
    },
    Rule::Enable { key: "MKQNX_CRYPTODEV", flag: "--cryptodev" },
    Rule::Value { key: "MKQNX_POLICY", flag: "--policy", fallback: "none" },
    Rule::Choice {
        flag: "--secpol",
        options: &[
            ("MKQNX_SECPOL_DEVELOP", "develop"),
            ("MKQNX_SECPOL_OPEN", "open"),
            ("MKQNX_SECPOL_SECURE", "secure"),
        ],
        baseline: "no",
        emit_baseline: false,
    },
    Rule::Enable { key: "MKQNX_QFIM", flag: "--qfim" },
    // Packages
    Rule::Package("TOMCRYPT"),
    Rule::Package("PERL"),
    Rule::Package("PKCS11"),
    Rule::Package("PYTHON"),
    Rule::Package("QAUDIT"),
    Rule::Package("VALGRIND"),
    // Diagnostics
    Rule::Enable { key: "MKQNX_IO_SOCK_DIAG", flag: "--io-sock-diag" },
    Rule::Enable { key: "MKQNX_SANITIZERS", flag: "--sanitizers" },
    Rule::Value { key: "MKQNX_QH_CONFIG", flag: "--qh_config", fallback: "no" },
    // Hardware
    Rule::Disable { key: "MKQNX_USB", flag: "--usb" },
    Rule::Enable { key: "MKQNX_GRAPHICS", flag: "--graphics" },
    Rule::Value { key: "MKQNX_NFS", flag: "--nfs", fallback: "no" },
    // System flags
    Rule::Enable { key: "MKQNX_ROOT", flag: "--root" },
    Rule::Disable { key: "MKQNX_ABLELOCK", flag: "--ablelock" },
    Rule::Enable { key: "MKQNX_SLM", flag: "--slm" },
];

impl Rule {
    /// Evaluate this rule against `config`, appending to `args`
    pub fn apply(&self, config: &ConfigStore, args: &mut Vec<String>) -> Result<()> {
        match *self {
            Rule::Always(arg) => args.push(arg.to_string()),
            Rule::Choice {
                flag,
                options,
                baseline,
                emit_baseline,
            } => {
                let mode = options
                    .iter()
                    .find(|(key, _)| config.get_bool(key))
                    .map_or(baseline, |(_, mode)| *mode);
                if emit_baseline || mode != baseline {
                    args.push(format!("{}={}", flag, mode));
                }
            }
            Rule::Switch { key, arg } => {
                if config.get_bool(key) {
                    args.push(arg.to_string());
                }
            }
            Rule::Enable { key, flag } => {
                if config.get_bool(key) {
                    args.push(format!("{}=yes", flag));
                }
            }
            Rule::Disable { key, flag } => {
                if !config.get_bool(key) {
                    args.push(format!("{}=no", flag));
                }
            }
            Rule::Explicit { key, flag } => {
                if config.contains(key) {
                    let answer = if config.get_bool(key) { "yes" } else { "no" };
                    args.push(format!("{}={}", flag, answer));
                }
            }
            Rule::Value { key, flag, fallback } => {
                let value = config.get_string(key, fallback);
                if !value.is_empty() && value != fallback {
                    args.push(format!("{}={}", flag, value));
                }
            }
            Rule::Int { key, flag, fallback } => {
                let value = config.get_int(key, fallback)?;
                if value != fallback {
                    args.push(format!("{}={}", flag, value));
                }
            }
            Rule::PresetOrValue {
                flag,
                preset_key,
                preset,
                value_key,
                baseline,
            } => {
                let value = if config.get_bool(preset_key) {
                    preset.to_string()
                } else {
                    config.get_string(value_key, "")
                };
                if !value.is_empty() && value != baseline {
                    args.push(format!("{}={}", flag, value));
                }
            }
            Rule::Count(name) => {
                let value = config.get_int(&format!("{}{}", SYMBOL_PREFIX, name), 0)?;
                if value > 0 {
                    args.push(format!("--{}={}", kebab_case(name), value));
                }
            }
            Rule::Package(name) => {
                if config.get_bool(&format!("{}{}", SYMBOL_PREFIX, name)) {
                    args.push(format!("--{}=yes", name.to_lowercase()));
                }
            }
        }
        Ok(())
    }
}

fn kebab_case(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

/// Builds argument vectors from a rule table
#[derive(Debug, Clone, Copy)]
pub struct ArgumentTranslator {
    rules: &'static [Rule],
}

impl Default for ArgumentTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentTranslator {
    /// Translator using the mkqnximage table
    pub fn new() -> Self {
        Self { rules: MKQNX_RULES }
    }

    pub fn with_rules(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// Evaluate every rule in order; fails only on a non-integer numeric field
    pub fn translate(&self, config: &ConfigStore) -> Result<Vec<String>> {
        let mut args = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            rule.apply(config, &mut args)?;
        }
        debug!("Translated {} config entries into {} arguments", config.len(), args.len());
        Ok(args)
    }
}
