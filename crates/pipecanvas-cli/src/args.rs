//! Command-line argument definitions for the pipecanvas CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, the flow direction,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the pipecanvas auto-arrange tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input pipeline document (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the laid out output document
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Flow direction (LR, RL, TB, BT); overrides the configured direction
    #[arg(short, long)]
    pub direction: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
