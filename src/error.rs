// file: src/error.rs
// version: 1.0.0
// guid: 3f1c9a2e-7b44-4d0e-9a61-5c2d8e0f4b17

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, MkqnxError>;

/// Error types for the mkqnx configuration tool
#[derive(Error, Debug)]
pub enum MkqnxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Kconfig not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("CONFIG_{key} is not an integer: '{value}'")]
    ParseError { key: String, value: String },

    #[error("'{0}' not found on PATH")]
    ToolNotFound(String),

    #[error("{tool} exited with code {code}")]
    ToolFailed { tool: String, code: i32 },

    #[error("{tool} was terminated by a signal")]
    ToolTerminated { tool: String },

    #[error("Invalid index: {0}")]
    InvalidIndex(usize),

    #[error("Invalid username '{0}': only letters, numbers, '-' and '_' allowed")]
    InvalidUsername(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Interrupted by user")]
    Interrupted,
}

impl MkqnxError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new integer parse error for a config key
    pub fn parse(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ParseError {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Process exit status to report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed { code, .. } => *code,
            Self::Interrupted | Self::ToolTerminated { .. } => 130,
            _ => 1,
        }
    }
}
