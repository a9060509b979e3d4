// file: src/image/runner.rs
// version: 1.0.0
// guid: 7c3e5a19-d2f8-4b60-9e47-1a8b6d0c2f35

//! Invocation of the external image builder

use crate::error::{MkqnxError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tokio::signal;
use tracing::{debug, info, warn};

/// Default name of the image builder executable
pub const MKQNX_TOOL: &str = "mkqnximage";

/// A located image builder executable
#[derive(Debug, Clone)]
pub struct ImageTool {
    name: String,
    path: PathBuf,
}

impl ImageTool {
    /// Look up `name` on PATH
    pub fn locate(name: &str) -> Result<Self> {
        let path = which::which(name).map_err(|_| MkqnxError::ToolNotFound(name.to_string()))?;
        debug!("Found {} at {}", name, path.display());
        Ok(Self {
            name: name.to_string(),
            path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full command line, executable first
    pub fn command_line(&self, args: &[String]) -> Vec<String> {
        let mut cmd = Vec::with_capacity(args.len() + 1);
        cmd.push(self.path.display().to_string());
        cmd.extend(args.iter().cloned());
        cmd
    }

    /// Run the tool with `args`, waiting for it to exit.
    ///
    /// Ctrl+C does not stop the wait: the child sees the interrupt itself and its
    /// exit status is what gets reported.
    pub async fn run(&self, args: &[String]) -> Result<()> {
        info!("Running {} with {} arguments", self.name, args.len());

        let mut child = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        let status = loop {
            tokio::select! {
                status = child.wait() => break status?,
                _ = signal::ctrl_c() => {
                    warn!("Interrupt received; waiting for {} to exit", self.name);
                }
            }
        };

        if status.success() {
            info!("{} completed successfully", self.name);
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(MkqnxError::ToolFailed {
                tool: self.name.clone(),
                code,
            }),
            None => Err(MkqnxError::ToolTerminated {
                tool: self.name.clone(),
            }),
        }
    }
}

/// Join a command line for display, quoting tokens a POSIX shell would split
pub fn shell_join(parts: &[String]) -> String {
    parts
        .iter()
        .map(|part| shell_quote(part))
        .collect::<Vec<_>>()
        .join(" ")
}

fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@%+=:,./-_".contains(c));

    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\"'\"'"))
    }
}
