//! custody-cli — submit custody ledger operations against a local snapshot.

mod audit;
mod commands;
mod config;
mod storage;

use anyhow::Context;
use clap::Parser;
use custody_utils::LogFormat;
use std::path::PathBuf;

use crate::audit::PendingEvents;
use crate::commands::Command;
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "custody-cli", about = "Chain-of-custody ledger for supply-chain batches")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "CUSTODY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the ledger snapshot.
    #[arg(long, env = "CUSTODY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "CUSTODY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "CUSTODY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    custody_utils::init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::debug!("loaded config from {}", path.display());
    }

    let snapshot_path = config.snapshot_path();
    let mut ledger = storage::load(&snapshot_path)?;
    let pending = PendingEvents::default();
    pending.attach(&mut ledger);

    let mutates = cli.command.mutates();
    commands::execute(cli.command, &mut ledger)?;
    if mutates {
        storage::save(&ledger, &snapshot_path)?;
    }
    // Only events whose state reached the snapshot file are reported.
    pending
        .flush_to(&mut std::io::stdout().lock())
        .context("writing audit events")?;
    Ok(())
}
