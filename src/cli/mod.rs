//! CLI module for Recode
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Recode CLI Media Pipeline
///
/// A command-line tool that transcodes or remuxes media files, copying
/// streams losslessly where requested and re-encoding them otherwise.
#[derive(Parser)]
#[command(name = "recode")]
#[command(about = "Recode CLI - transcode and remux media files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Transcode streams into a new container, copying where configured
    Transcode(args::TranscodeArgs),
    /// Change the container format without re-encoding any payload
    Remux(args::RemuxArgs),
    /// Inspect media file information
    Inspect(args::InspectArgs),
}
