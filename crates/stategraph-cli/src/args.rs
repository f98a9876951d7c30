//! Command-line argument definitions for the Stategraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`].

use clap::Parser;

/// Lay out a workflow definition as a graph of positioned nodes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input definition (JSON)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file, `-` for stdout
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Fail on malformed definitions instead of writing the empty graph
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Whether the output goes to stdout.
    pub fn writes_stdout(&self) -> bool {
        self.output == "-"
    }
}
