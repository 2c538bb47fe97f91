//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from library errors to exit codes and user-facing messages.

use askgate_core::ConfigError;
use askgate_runtime::SupervisorError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Gateway lifecycle error.
    #[error("{0}")]
    Server(String),

    /// Kill or status request failed.
    #[error("{0}")]
    Control(String),

    /// Configuration error.
    #[error("{0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (reported by clap before we run)
    /// - 78: Configuration error (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Server(_) | Self::Control(_) => 1,
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<SupervisorError> for CliError {
    fn from(err: SupervisorError) -> Self {
        Self::Server(err.to_string())
    }
}
