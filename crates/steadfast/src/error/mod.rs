//! Error types, transient-failure classification, and user-facing messages.
//!
//! # Key Items
//!
//! - [`is_transient_error`] - decides whether a failure is worth retrying
//! - [`format_error_message`] - maps a failure to text that is safe to show
//! - [`ExecuteError`] - what a [`Retryable`](crate::retryable::Retryable) handle returns
//! - [`SettingsError`] - invalid declarative retry settings

mod message;
mod transient;

pub use message::{DEFAULT_FALLBACK_MESSAGE, format_error_message};
pub use transient::{TRANSIENT_KEYWORDS, is_transient, is_transient_error, is_transient_message};

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Message carried by [`ExecuteError::InProgress`].
pub const IN_PROGRESS_MESSAGE: &str = "Operation already in progress";

/// Failure returned by [`Retryable::execute`](crate::retryable::Retryable::execute).
///
/// `InProgress` is a misuse signal produced by the handle itself: it never
/// reaches the monitor and is never recorded as the handle's last error.
#[derive(Debug)]
pub enum ExecuteError<E> {
    /// Another `execute()` on the same handle has not settled yet.
    InProgress,

    /// The operation failed; the same `Arc` is kept as the handle's last error.
    Failed(Arc<E>),
}

impl<E> ExecuteError<E> {
    /// Whether this is the synthetic in-progress signal.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// The operation's error, if the operation actually ran and failed.
    pub fn failure(&self) -> Option<&Arc<E>> {
        match self {
            Self::Failed(err) => Some(err),
            Self::InProgress => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for ExecuteError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str(IN_PROGRESS_MESSAGE),
            Self::Failed(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl<E: Error + 'static> Error for ExecuteError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InProgress => None,
            Self::Failed(err) => err.source(),
        }
    }
}

/// Errors raised while loading declarative retry settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings document could not be parsed.
    #[error("invalid retry settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The base delay is larger than the cap it is supposed to grow towards.
    #[error("base delay ({base_delay_ms}ms) exceeds max delay ({max_delay_ms}ms)")]
    InvertedDelays {
        /// Configured base delay in milliseconds
        base_delay_ms: u64,
        /// Configured max delay in milliseconds
        max_delay_ms: u64,
    },
}
