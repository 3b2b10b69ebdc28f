// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::InputFormat;

/// Command-line arguments for `prodline`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "prodline",
    version,
    about = "Simulate a tree of production machines and report maintenance costs.",
    long_about = None
)]
pub struct CliArgs {
    /// Plant description (line format or TOML).
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Where to write final products and the maintenance log.
    #[arg(value_name = "OUTPUT")]
    pub output: String,

    /// Input encoding: auto (by extension), lines, or toml.
    #[arg(long, value_name = "FORMAT", default_value = "auto")]
    pub format: InputFormat,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PRODLINE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the production tree, but don't run it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
