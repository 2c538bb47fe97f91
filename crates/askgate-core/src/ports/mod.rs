//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No axum/hyper types in any signature
//! - No process or socket implementation details
//! - Notification sinks are one-way: callers never inspect a result

pub mod ask;
pub mod notifier;

use thiserror::Error;

pub use ask::{AskError, AskPort, FragmentStream};
pub use notifier::{NoopNotifier, NotifierPort, NotifyKind};

use crate::config::ConfigError;

/// Core error type for semantic domain errors.
///
/// Adapters map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (invalid input).
    #[error("{0}")]
    Validation(String),

    /// Configuration error.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The AI capability failed.
    #[error(transparent)]
    Upstream(#[from] AskError),
}
