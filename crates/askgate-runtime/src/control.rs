//! Client side of the gateway's lifecycle routes.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct KillReply {
    message: String,
}

/// Ask the gateway at `base_url` to shut down.
///
/// Returns the message from the gateway's reply. `/kill` needs no
/// credentials.
pub async fn request_kill(base_url: &str, timeout: Duration) -> Result<String> {
    let client = Client::builder().timeout(timeout).build()?;
    let url = format!("{base_url}/kill");
    debug!("POST {url}");

    let response = client
        .post(&url)
        .send()
        .await
        .with_context(|| format!("no gateway answered at {base_url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("gateway answered {status}");
    }

    let reply: KillReply = response
        .json()
        .await
        .context("unexpected reply to /kill")?;
    Ok(reply.message)
}
