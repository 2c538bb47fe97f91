//! Gateway configuration types and validation.
//!
//! Pure domain types with no infrastructure dependencies. Where the values
//! come from (flags, environment, `.env`) is the adapter's concern.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Default port the gateway listens on.
pub const DEFAULT_PORT: u16 = 1235;

/// Default bind host. The gateway is a local service.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Model identifier used when a request does not name one.
pub const DEFAULT_MODEL: &str = "default";

/// Delay between answering `/kill` and closing the listener.
pub const DEFAULT_KILL_GRACE_MS: u64 = 100;

/// Per-attempt timeout for health probes.
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 500;

/// Errors raised by [`GatewayConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The port is zero or otherwise unusable.
    #[error("The port is not defined. Please set a valid port in the preferences.")]
    InvalidPort,

    /// No shared secret was configured.
    #[error("The API key is not defined. Please set an API key in the preferences.")]
    MissingApiKey,

    /// The bind host is empty.
    #[error("Invalid host: {0:?}")]
    InvalidHost(String),
}

/// Configuration for one gateway instance.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Host to bind to (e.g., "127.0.0.1").
    pub host: String,
    /// Port to bind to. Zero is only accepted by tests that bind directly.
    pub port: u16,
    /// Shared secret expected in `Authorization: Bearer <api_key>`.
    pub api_key: String,
    /// Model identifier substituted when a request omits `model`.
    pub default_model: String,
    /// Grace period between the `/kill` response and socket teardown.
    pub kill_grace: Duration,
    /// Timeout for a single health probe attempt.
    pub probe_timeout: Duration,
}

impl GatewayConfig {
    /// Create config with defaults for everything except the API key.
    #[must_use]
    pub fn with_defaults(api_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_key: api_key.into(),
            default_model: DEFAULT_MODEL.to_string(),
            kill_grace: Duration::from_millis(DEFAULT_KILL_GRACE_MS),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        }
    }

    /// Set the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Check that the configuration can be served.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidHost(self.host.clone()));
        }
        Ok(())
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL a local client uses to reach this gateway.
    ///
    /// Wildcard binds are reached through loopback.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "127.0.0.1",
            other => other,
        };
        format!("http://{host}:{}", self.port)
    }
}

// The API key must never end up in logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("default_model", &self.default_model)
            .field("kill_grace", &self.kill_grace)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}
