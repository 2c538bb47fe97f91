//! Gateway supervisor: owns the listening socket for one gateway instance.
//!
//! Key design decisions:
//! - **Probe-before-bind**: a healthy `/health` on the target port aborts
//!   startup; nothing is bound
//! - **Bind-then-report**: TcpListener binds FIRST, then reports real address
//! - **Respond-then-close**: `/kill` and [`ServerInstance::stop`] cancel the
//!   same token; in-flight requests get a bounded drain window
//! - **Observable state**: every transition is published on a `watch` channel

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result as AnyResult;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use askgate_core::{AskPort, GatewayConfig, NotifierPort, NotifyKind};

use crate::health::probe_health;

/// How long in-flight requests may run after the listener closes.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle of the gateway instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing bound.
    Stopped,
    /// Probing for an existing instance and binding.
    Starting,
    /// Bound and accepting.
    Listening {
        /// Address the gateway is listening on.
        address: SocketAddr,
    },
    /// Listener closed, draining in-flight requests.
    Stopping,
    /// The listener failed, or stopped without being asked to.
    Faulted { reason: String },
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Starting => write!(f, "Starting"),
            Self::Listening { address } => write!(f, "Listening on {address}"),
            Self::Stopping => write!(f, "Stopping"),
            Self::Faulted { reason } => write!(f, "Faulted: {reason}"),
        }
    }
}

/// Error from supervisor operations.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// A healthy gateway already answers on the port.
    #[error("Server is already running on port {port}")]
    AlreadyRunning { port: u16 },

    /// The port is held by another socket.
    #[error("Port {port} is already in use")]
    PortInUse { port: u16 },

    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {reason}")]
    BindFailed { address: String, reason: String },

    /// Gateway is not running.
    #[error("Server is not running")]
    NotRunning,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Starts gateway instances and publishes their lifecycle.
///
/// # Example
///
/// ```ignore
/// let supervisor = GatewaySupervisor::new(config, ask, notifier);
/// let instance = supervisor.start().await?;
/// println!("Listening on {}", instance.address());
/// instance.wait().await?;
/// ```
pub struct GatewaySupervisor {
    config: GatewayConfig,
    ask: Arc<dyn AskPort>,
    notifier: Arc<dyn NotifierPort>,
    state: Arc<watch::Sender<LifecycleState>>,
}

impl GatewaySupervisor {
    pub fn new(
        config: GatewayConfig,
        ask: Arc<dyn AskPort>,
        notifier: Arc<dyn NotifierPort>,
    ) -> Self {
        let (state, _) = watch::channel(LifecycleState::Stopped);
        Self {
            config,
            ask,
            notifier,
            state: Arc::new(state),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Start a gateway instance.
    ///
    /// Probes the configured port first and refuses to start when a
    /// gateway already answers there. Otherwise binds FIRST, then spawns
    /// the server task.
    ///
    /// # Errors
    ///
    /// Returns error if an instance is already running or if bind fails.
    pub async fn start(&self) -> Result<ServerInstance, SupervisorError> {
        let port = self.config.port;
        self.state.send_replace(LifecycleState::Starting);
        self.notifier
            .notify(NotifyKind::Info, "Server starting...", &format!("Port {port}"));

        if probe_health(&self.config.base_url(), self.config.probe_timeout).await {
            info!(port, "Gateway already running; not binding");
            self.state.send_replace(LifecycleState::Stopped);
            let err = SupervisorError::AlreadyRunning { port };
            self.notifier
                .notify(NotifyKind::Failure, "Failed to start server", &err.to_string());
            return Err(err);
        }

        let listener = match self.bind().await {
            Ok(listener) => listener,
            Err(err) => {
                error!(port, "Gateway bind failed: {err}");
                self.state.send_replace(LifecycleState::Faulted {
                    reason: err.to_string(),
                });
                self.notifier
                    .notify(NotifyKind::Failure, "Failed to start server", &err.to_string());
                return Err(err);
            }
        };

        let address = listener
            .local_addr()
            .map_err(|e| SupervisorError::Internal(format!("Failed to get local address: {e}")))?;

        info!("Gateway bound to {address}");

        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        let serve_config = self.config.clone().with_port(address.port());
        let ask = Arc::clone(&self.ask);

        let join: JoinHandle<AnyResult<()>> = tokio::spawn(async move {
            debug!(addr = %address, "Gateway task starting");
            askgate_proxy::serve(listener, serve_config, ask, cancel_clone).await
        });

        self.state.send_replace(LifecycleState::Listening { address });
        self.notifier.notify(
            NotifyKind::Success,
            "Server started",
            &format!("Listening on http://{address}/v1"),
        );

        Ok(ServerInstance {
            address,
            cancel,
            join,
            state: Arc::clone(&self.state),
            notifier: Arc::clone(&self.notifier),
        })
    }

    async fn bind(&self) -> Result<TcpListener, SupervisorError> {
        let bind_addr = self.config.bind_address();
        TcpListener::bind(&bind_addr).await.map_err(|e| {
            if e.kind() == io::ErrorKind::AddrInUse {
                SupervisorError::PortInUse {
                    port: self.config.port,
                }
            } else {
                SupervisorError::BindFailed {
                    address: bind_addr.clone(),
                    reason: e.to_string(),
                }
            }
        })
    }
}

impl fmt::Debug for GatewaySupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewaySupervisor")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// A running gateway: one bound socket on one port.
///
/// Never restarted in place; once it stops, start a new one.
pub struct ServerInstance {
    address: SocketAddr,
    cancel: CancellationToken,
    join: JoinHandle<AnyResult<()>>,
    state: Arc<watch::Sender<LifecycleState>>,
    notifier: Arc<dyn NotifierPort>,
}

impl ServerInstance {
    /// Address the gateway is listening on.
    pub const fn address(&self) -> SocketAddr {
        self.address
    }

    /// Token that closes the listener when cancelled (e.g. on Ctrl-C).
    pub fn shutdown_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Close the listener now and wait for the instance to finish.
    pub async fn stop(self) -> Result<(), SupervisorError> {
        info!("Stopping gateway on {}", self.address);
        self.cancel.cancel();
        self.wait().await
    }

    /// Run until the instance stops.
    ///
    /// After cancellation (from `/kill`, [`stop`](Self::stop) or the
    /// shutdown token), in-flight requests get [`DRAIN_TIMEOUT`] before the
    /// server task is aborted.
    ///
    /// # Errors
    ///
    /// Returns error if the listener failed or exited on its own.
    pub async fn wait(self) -> Result<(), SupervisorError> {
        let Self {
            address,
            cancel,
            mut join,
            state,
            notifier,
        } = self;

        let early = tokio::select! {
            res = &mut join => Some(res),
            () = cancel.cancelled() => None,
        };

        let outcome = match early {
            // Finished before anyone asked it to
            Some(res) if !cancel.is_cancelled() => {
                let reason = match res {
                    Ok(Ok(())) => "listener closed unexpectedly".to_string(),
                    Ok(Err(e)) => format!("listener failed: {e}"),
                    Err(join_err) => format!("server task panicked: {join_err}"),
                };
                Err(reason)
            }
            Some(res) => finished(res),
            None => {
                state.send_replace(LifecycleState::Stopping);
                match tokio::time::timeout(DRAIN_TIMEOUT, &mut join).await {
                    Ok(res) => finished(res),
                    Err(_) => {
                        warn!("Drain window elapsed; aborting in-flight requests");
                        join.abort();
                        Ok(())
                    }
                }
            }
        };

        match outcome {
            Ok(()) => {
                info!("Gateway on {address} stopped");
                state.send_replace(LifecycleState::Stopped);
                let port = address.port();
                notifier.notify(NotifyKind::Info, "Server stopped", &format!("Port {port}"));
                Ok(())
            }
            Err(reason) => {
                error!("Gateway on {address} faulted: {reason}");
                state.send_replace(LifecycleState::Faulted {
                    reason: reason.clone(),
                });
                notifier.notify(NotifyKind::Failure, "Server error", &reason);
                Err(SupervisorError::Internal(reason))
            }
        }
    }
}

/// Interpret the server task result after cancellation.
fn finished(res: Result<AnyResult<()>, tokio::task::JoinError>) -> Result<(), String> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("listener failed: {e}")),
        Err(join_err) => Err(format!("server task panicked: {join_err}")),
    }
}

impl fmt::Debug for ServerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerInstance")
            .field("address", &self.address)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
