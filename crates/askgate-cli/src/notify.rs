//! Terminal rendering of control-path notifications.

use askgate_core::{NotifierPort, NotifyKind};

/// Prints notifications as single terminal lines.
///
/// Failures go to stderr, everything else to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    fn render(kind: NotifyKind, title: &str, message: &str) -> String {
        let mark = match kind {
            NotifyKind::Success => "✓",
            NotifyKind::Failure => "✗",
            NotifyKind::Info => "•",
        };
        if message.is_empty() {
            format!("{mark} {title}")
        } else {
            format!("{mark} {title}: {message}")
        }
    }
}

impl NotifierPort for TerminalNotifier {
    fn notify(&self, kind: NotifyKind, title: &str, message: &str) {
        let line = Self::render(kind, title, message);
        match kind {
            NotifyKind::Failure => eprintln!("{line}"),
            NotifyKind::Success | NotifyKind::Info => println!("{line}"),
        }
    }
}
