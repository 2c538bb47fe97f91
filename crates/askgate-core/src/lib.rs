#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{
    ConfigError, DEFAULT_HOST, DEFAULT_KILL_GRACE_MS, DEFAULT_MODEL, DEFAULT_PORT,
    DEFAULT_PROBE_TIMEOUT_MS, GatewayConfig,
};
pub use domain::{AskRequest, ModelDescriptor};
pub use ports::{
    AskError, AskPort, CoreError, FragmentStream, NoopNotifier, NotifierPort,
    NotifyKind,
};
