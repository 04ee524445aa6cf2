//! CLI module for the timelapse pipeline
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// Timelapse pipeline
///
/// Burns the capture time into each raw still of a date, then encodes the
/// stamped stills into one video. Run at most one instance per date at a time.
#[derive(Parser, Debug)]
#[command(name = "timelapse")]
#[command(about = "Stamp camera captures and assemble them into a timelapse video")]
#[command(version)]
pub struct Cli {
    /// TOML or YAML configuration file
    #[arg(long, global = true, env = "TIMELAPSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level or filter directive
    #[arg(long, default_value = "info", global = true, env = "TIMELAPSE_LOG_LEVEL")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true, env = "TIMELAPSE_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Print the run report as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stamp the raw stills of a date, then assemble the video
    Run(args::RunArgs),
    /// Stamp the raw stills of a date
    Stamp(args::StampArgs),
    /// Assemble stamped stills into a video
    Assemble(args::AssembleArgs),
}
