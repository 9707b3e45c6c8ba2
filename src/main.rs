//! Recode CLI Media Pipeline
//!
//! A command-line tool that transcodes or remuxes media files: per
//! elementary stream it either re-encodes through a decoder/encoder bridge
//! or copies packets unchanged into the new container.
//!
//! # Usage
//!
//! ```bash
//! recode transcode input.mkv output.mp4 libx264 x264-params keyint=60
//! recode transcode input.mkv output.mp4 libx264 "" "" true false
//! recode remux input.mkv output.mp4
//! recode inspect input.mp4 --json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use recode_cli::cli::{commands, Cli, Commands};

/// Main entry point for the Recode CLI application
fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute the requested command
    match cli.command {
        Commands::Transcode(args) => {
            commands::transcode(args)?;
        }
        Commands::Remux(args) => {
            commands::remux(args)?;
        }
        Commands::Inspect(args) => {
            commands::inspect(args)?;
        }
    }

    info!("Recode CLI completed successfully");
    Ok(())
}
