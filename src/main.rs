// file: src/main.rs
// version: 2.0.0
// guid: h8i9j0k1-l2m3-4567-8901-234567hijklm

//! mkqnx-config - Main entry point

use anyhow::Context;
use clap::Parser;
use mkqnx_config::{
    cli::{args::Commands, commands::*, expand_path, Cli},
    logging::{init_logger, with_async_operation_span},
    MkqnxError, VERSION,
};
use tokio::signal;
use tracing::{debug, error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.verbose, cli.quiet) {
        eprintln!("{}", e);
    }
    debug!("mkqnx-config {}", VERSION);

    // build reports the child's own status even after Ctrl+C
    let code = if matches!(cli.command, Commands::Build { .. }) {
        exit_status(run(cli.command).await)
    } else {
        tokio::select! {
            result = run(cli.command) => exit_status(result),
            _ = signal::ctrl_c() => {
                warn!("Interrupted by user");
                130
            }
        }
    };

    std::process::exit(code);
}

fn exit_status(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            e.downcast_ref::<MkqnxError>()
                .map(MkqnxError::exit_code)
                .unwrap_or(1)
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Defconfig { kconfig, output } => {
            let kconfig = expand_path(&kconfig);
            let output = expand_path(&output);
            with_async_operation_span("defconfig", || defconfig_command(&kconfig, &output))
                .await
                .with_context(|| format!("Failed to generate {}", output.display()))
        }
        Commands::Build {
            config,
            tool,
            dry_run,
            json,
        } => {
            let config = expand_path(&config);
            with_async_operation_span("build", || build_command(&config, &tool, dry_run, json))
                .await
                .context("Image build failed")
        }
        Commands::Users { config, kconfig } => {
            let config = expand_path(&config);
            let kconfig = expand_path(&kconfig);
            with_async_operation_span("users", || users_command(&config, &kconfig))
                .await
                .with_context(|| format!("Failed to edit users in {}", config.display()))
        }
        Commands::Show { config } => {
            let config = expand_path(&config);
            with_async_operation_span("show", || show_command(&config))
                .await
                .with_context(|| format!("Failed to show {}", config.display()))
        }
    }
}
