//! `askgate kill`: stop a running gateway.

use askgate_core::{GatewayConfig, NotifierPort, NotifyKind};
use askgate_runtime::{
    POLL_DEADLINE, SupervisorError, probe_health, request_kill, wait_until_down,
};

use crate::error::CliError;

/// Send `/kill`, report the reply, then confirm the port went quiet.
pub async fn execute(
    config: &GatewayConfig,
    notifier: &dyn NotifierPort,
) -> Result<(), CliError> {
    let base_url = config.base_url();

    let outcome = if probe_health(&base_url, config.probe_timeout).await {
        request_kill(&base_url, config.probe_timeout)
            .await
            .map_err(|e| format!("{e:#}"))
    } else {
        Err(SupervisorError::NotRunning.to_string())
    };

    let message = match outcome {
        Ok(message) => message,
        Err(reason) => return Err(failed(notifier, &reason)),
    };
    notifier.notify(NotifyKind::Success, &message, "");

    if wait_until_down(&base_url, config.probe_timeout, POLL_DEADLINE).await {
        Ok(())
    } else {
        let reason = format!("still answering on port {} after {POLL_DEADLINE:?}", config.port);
        Err(failed(notifier, &reason))
    }
}

fn failed(notifier: &dyn NotifierPort, reason: &str) -> CliError {
    let message = format!("Failed to kill server: {reason}");
    notifier.notify(NotifyKind::Failure, &message, "");
    CliError::Control(message)
}
