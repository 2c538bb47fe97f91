//! `askgate start`: run the gateway in the foreground.

use std::sync::Arc;

use askgate_core::{AskPort, GatewayConfig, NotifierPort};
use askgate_runtime::GatewaySupervisor;
use tracing::{info, warn};

use crate::error::CliError;

/// Start the gateway and block until it is killed or interrupted.
pub async fn execute(
    config: GatewayConfig,
    ask: Arc<dyn AskPort>,
    notifier: Arc<dyn NotifierPort>,
) -> Result<(), CliError> {
    info!(config = ?config, "Starting gateway");

    let supervisor = GatewaySupervisor::new(config, ask, notifier);
    let instance = supervisor.start().await?;

    let shutdown = instance.shutdown_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted; shutting down");
                shutdown.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    instance.wait().await?;
    Ok(())
}
