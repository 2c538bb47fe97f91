#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary entry point only
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use reqwest as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod parser;

// Re-export primary types for convenient access
pub use commands::{Commands, StartArgs};
pub use error::CliError;
pub use notify::TerminalNotifier;
pub use parser::Cli;
