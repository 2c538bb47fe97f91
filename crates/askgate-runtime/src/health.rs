//! Health probing for a gateway instance.
//!
//! A 2xx answer from `/health` is the only positive signal. Connection
//! errors, non-2xx statuses and timeouts all mean "not running".

use std::time::Duration;

use reqwest::Client;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Upper bound for the readiness and shutdown-confirmation polls.
pub const POLL_DEADLINE: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Single bounded probe of `{base_url}/health`.
pub async fn probe_health(base_url: &str, timeout: Duration) -> bool {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            debug!("Failed to build health client: {e}");
            return false;
        }
    };

    probe_with(&client, base_url).await
}

async fn probe_with(client: &Client, base_url: &str) -> bool {
    let url = format!("{base_url}/health");
    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            debug!(status = %response.status(), "Health probe returned non-success");
            false
        }
        Err(e) => {
            debug!("Health probe failed: {e}");
            false
        }
    }
}

/// Poll until `/health` answers or `deadline` passes.
pub async fn wait_until_healthy(
    base_url: &str,
    probe_timeout: Duration,
    deadline: Duration,
) -> bool {
    poll_until(base_url, probe_timeout, deadline, true).await
}

/// Poll until `/health` stops answering or `deadline` passes.
///
/// Returns `false` when the server is still answering at the deadline.
pub async fn wait_until_down(
    base_url: &str,
    probe_timeout: Duration,
    deadline: Duration,
) -> bool {
    poll_until(base_url, probe_timeout, deadline, false).await
}

async fn poll_until(
    base_url: &str,
    probe_timeout: Duration,
    deadline: Duration,
    want_healthy: bool,
) -> bool {
    let Ok(client) = Client::builder().timeout(probe_timeout).build() else {
        return false;
    };
    let give_up = Instant::now() + deadline;

    loop {
        if probe_with(&client, base_url).await == want_healthy {
            return true;
        }
        if Instant::now() + POLL_INTERVAL > give_up {
            debug!(want_healthy, "Gave up polling {base_url}/health after {deadline:?}");
            return false;
        }
        sleep(POLL_INTERVAL).await;
    }
}
