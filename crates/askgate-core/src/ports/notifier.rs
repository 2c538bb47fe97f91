//! Notification sink for user-visible control-path messages.
//!
//! Start/stop outcomes are shown to the user (toast, HUD, terminal line).
//! The sink is fire-and-forget: it must not block and its outcome never
//! affects gateway behaviour. Protocol errors are never routed here.

/// Category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    /// An action completed.
    Success,
    /// An action failed.
    Failure,
    /// Neutral progress information.
    Info,
}

/// One-way notification sink.
///
/// # Implementations
///
/// - `NoopNotifier` - For tests and embedded use
/// - Adapter-specific implementations (terminal, desktop toasts)
pub trait NotifierPort: Send + Sync {
    /// Deliver a notification. Must not block.
    fn notify(&self, kind: NotifyKind, title: &str, message: &str);
}

/// A notifier that discards everything.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl NoopNotifier {
    /// Create a new no-op notifier.
    pub const fn new() -> Self {
        Self
    }
}

impl NotifierPort for NoopNotifier {
    fn notify(&self, _kind: NotifyKind, _title: &str, _message: &str) {}
}
