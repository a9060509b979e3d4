// file: src/lib.rs
// version: 3.0.0
// guid: d82472d1-7f0f-4eb4-b0a3-6e1547103eb4

//! # mkqnx-config
//!
//! Kconfig-style configuration front end for the QNX `mkqnximage` tool.
//!
//! A `Kconfig` schema supplies defaults, a flat `.config` file holds the chosen values,
//! and the `build` step translates those values into an ordered `mkqnximage` argument list.

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod logging;
pub mod users;

pub use error::{MkqnxError, Result};

/// Version information for the tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
