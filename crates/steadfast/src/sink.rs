//! Injected side-effect sinks for terminal failures.
//!
//! The safe executor reports every terminal failure to a [`Monitor`] and,
//! when asked, a user-facing message to a [`Notifier`]. The application owns
//! the real implementations (an error tracker, a toast system); this module
//! only defines the seams plus tracing-backed defaults.

use std::error::Error;

/// Receives every terminal failure, exactly once.
pub trait Monitor: Send + Sync {
    /// Record a failure.
    fn capture(&self, error: &(dyn Error + 'static));
}

/// Shows a failure message to the user.
pub trait Notifier: Send + Sync {
    /// Display `message` as an error notification.
    fn show_error(&self, message: &str);
}

/// Logs captured failures at `ERROR` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMonitor;

impl Monitor for TracingMonitor {
    fn capture(&self, error: &(dyn Error + 'static)) {
        match error.source() {
            Some(source) => tracing::error!(error = %error, source = %source, "operation failed"),
            None => tracing::error!(error = %error, "operation failed"),
        }
    }
}

/// Logs notification messages at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str) {
        tracing::warn!(notification = message, "user notification");
    }
}

impl<F> Monitor for F
where
    F: Fn(&(dyn Error + 'static)) + Send + Sync,
{
    fn capture(&self, error: &(dyn Error + 'static)) {
        self(error)
    }
}
