//! `askgate status`: one bounded health probe.

use askgate_core::GatewayConfig;
use askgate_runtime::probe_health;

/// Status line for a gateway on `port`.
pub fn status_line(port: u16, running: bool) -> String {
    if running {
        format!("Port: {port} ● Running")
    } else {
        format!("Port: {port} ○ Stopped")
    }
}

/// Probe the gateway and print its status. Returns whether it is running.
pub async fn execute(config: &GatewayConfig) -> bool {
    let running = probe_health(&config.base_url(), config.probe_timeout).await;
    println!("{}", status_line(config.port, running));
    running
}
