#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use serde_json as _;

pub mod ask;
pub mod control;
pub mod health;
pub mod supervisor;

pub use ask::CommandAsk;
pub use control::request_kill;
pub use health::{POLL_DEADLINE, probe_health, wait_until_down, wait_until_healthy};
pub use supervisor::{
    DRAIN_TIMEOUT, GatewaySupervisor, LifecycleState, ServerInstance, SupervisorError,
};
