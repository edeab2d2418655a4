//! WET - Main Entry Point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error};
use wet_cli::Command;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "WET_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = wet_cli::prepare(args.config.as_deref(), args.log_level)?;
    debug!("Configuration loaded: {:?}", config);

    match wet_cli::run(args.command, &config).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {}", e);
            Err(e.into())
        }
    }
}
