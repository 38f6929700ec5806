//! Marquee CLI - Command-line interface
//!
//! Browse, search and filter the catalogue from a terminal.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use marquee_core::MarqueeConfig;
use marquee_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Browse movies and TV shows from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Write full debug logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.log_file.as_deref())?;

    let config = MarqueeConfig::from_env();
    commands::handle_command(cli.command, &config).await
}
