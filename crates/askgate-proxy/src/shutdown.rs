//! Respond-then-close shutdown for the `/kill` route.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Handle that lets a request handler close the listener it is served by.
///
/// The handler answers first; the token is cancelled only after `grace`,
/// so the response is flushed before the socket goes away.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    token: CancellationToken,
    grace: Duration,
}

impl ShutdownHandle {
    pub const fn new(token: CancellationToken, grace: Duration) -> Self {
        Self { token, grace }
    }

    /// Schedule shutdown after the grace delay. Repeated calls are harmless.
    pub fn trigger(&self) {
        if self.token.is_cancelled() {
            debug!("Shutdown already in progress");
            return;
        }

        let token = self.token.clone();
        let grace = self.grace;
        info!(grace = ?grace, "Shutdown requested");

        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            token.cancel();
        });
    }

    /// Token observed by the server's graceful-shutdown future.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
