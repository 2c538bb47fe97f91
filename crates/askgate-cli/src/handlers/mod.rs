//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(...) -> Result<(), CliError>`
//! - Thin wrappers that call into `askgate-runtime` and format output
//!   for the terminal

pub mod kill;
pub mod start;
pub mod status;
