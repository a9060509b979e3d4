// file: src/cli/commands.rs
// version: 2.0.0
// guid: g7h8i9j0-k1l2-3456-7890-123456ghijkl

//! Command implementations for the CLI

use crate::{
    config::{write_default_config, ConfigStore},
    error::MkqnxError,
    image::{build_arguments, shell_join, ImageTool},
    users::{load_users, save_users, EditorOutcome, TerminalPrompt, UserEditor},
    Result,
};
use colored::Colorize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Generate a default config from the schema
pub async fn defconfig_command(kconfig: &Path, output: &Path) -> Result<()> {
    info!("Generating default config from {}", kconfig.display());

    let defaults = write_default_config(kconfig, output)?;
    debug!("Default config holds {} symbols", defaults.len());

    println!("Wrote {}", output.display());
    Ok(())
}

/// Translate the config into mkqnximage arguments and run the tool
pub async fn build_command(config_path: &Path, tool: &str, dry_run: bool, json: bool) -> Result<()> {
    let config = ConfigStore::load(config_path)?;
    info!(
        "Loaded {} symbols from {}",
        config.len(),
        config_path.display()
    );

    let (args, warnings) = build_arguments(&config)?;
    if !warnings.is_empty() {
        debug!("{} values were reset before translation", warnings.len());
    }

    let image_tool = match ImageTool::locate(tool) {
        Ok(found) => Some(found),
        Err(e) if dry_run => {
            warn!("{}; showing the command anyway", e);
            None
        }
        Err(e) => return Err(e),
    };

    let command_line = match &image_tool {
        Some(found) => found.command_line(&args),
        None => std::iter::once(tool.to_string()).chain(args.iter().cloned()).collect(),
    };

    let rendered = if json {
        serde_json::to_string(&args)?
    } else {
        shell_join(&command_line)
    };

    if dry_run {
        println!("{}", rendered);
        info!("DRY RUN: not running {}", tool);
        return Ok(());
    }

    println!("Running command: {}", rendered);
    match image_tool {
        Some(found) => found.run(&args).await,
        None => Err(MkqnxError::ToolNotFound(tool.to_string())),
    }
}

/// Edit the user list of a config, generating the config first when missing
pub async fn users_command(config_path: &Path, kconfig: &Path) -> Result<()> {
    if !config_path.exists() {
        println!(
            "{} not found; generating defaults from {}",
            config_path.display(),
            kconfig.display()
        );
        write_default_config(kconfig, config_path)?;
    }

    let config = ConfigStore::load(config_path)?;
    let users = load_users(&config);
    info!("Editing {} configured users", users.len());

    let outcome = tokio::task::spawn_blocking(move || UserEditor::new(TerminalPrompt, users).run())
        .await
        .map_err(|e| MkqnxError::config(format!("User editor task failed: {}", e)))??;

    match outcome {
        EditorOutcome::Saved(users) => {
            save_users(config_path, &users)?;
            println!("{} {}", "Saved to".green(), config_path.display());
        }
        EditorOutcome::Cancelled => debug!("User edit cancelled"),
    }

    Ok(())
}

/// Print the parsed config as JSON
pub async fn show_command(config_path: &Path) -> Result<()> {
    let config = ConfigStore::load(config_path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
