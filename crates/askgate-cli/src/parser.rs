//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use askgate_core::{DEFAULT_HOST, DEFAULT_PORT};

use crate::commands::Commands;

/// Command-line interface for the askgate gateway.
///
/// Global options locate the gateway; subcommands act on it.
#[derive(Parser, Debug)]
#[command(name = "askgate")]
#[command(about = "Serve an AI command behind an OpenAI-compatible API")]
#[command(version)]
pub struct Cli {
    /// Port the gateway listens on
    #[arg(long, env = "ASKGATE_PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Host the gateway binds to
    #[arg(long, env = "ASKGATE_HOST", default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
