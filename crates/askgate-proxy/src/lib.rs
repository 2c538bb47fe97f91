#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dev-dependencies used only by the integration tests
#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tower as _;

pub mod auth;
pub mod error;
pub mod models;
pub mod server;
pub mod shutdown;
pub mod stream;
pub mod translate;

pub use auth::AuthGuard;
pub use error::HttpError;
pub use server::{GatewayState, create_router, serve};
pub use shutdown::ShutdownHandle;
