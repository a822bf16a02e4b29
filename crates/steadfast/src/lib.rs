#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Resilient execution for fallible async operations.
//!
//! This crate wraps an async operation so that:
//!
//! - **Transient failures are retried** with capped exponential backoff and
//!   jitter via [`retry::with_retry`]
//! - **Terminal failures are reported** to an injected monitor, optionally
//!   surfaced to the user, and returned as a plain `Result` via
//!   [`safe::SafeExecutor`]
//! - **Repeated user actions stay single-flight** via
//!   [`retryable::Retryable`], which remembers the last failure
//!
//! Errors are classified as transient by keyword matching on their message
//! (see [`error::is_transient_error`]), and [`error::format_error_message`]
//! turns any error into text fit for an end user.
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use steadfast::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let options = SafeOptions::new()
//!     .with_retry_config(
//!         RetryConfig::builder()
//!             .max_retries(3)
//!             .base_delay(Duration::from_millis(100))
//!             .build(),
//!     )
//!     .with_notification()
//!     .with_error_message("Could not load laws");
//!
//! let laws = safe_async(&|| async { Ok::<_, std::io::Error>(vec!["law"]) }, &options).await;
//! assert_eq!(laws.unwrap(), vec!["law"]);
//! # }
//! ```

pub mod error;
pub mod operation;
pub mod retry;
pub mod retryable;
pub mod safe;
pub mod sink;

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use steadfast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ExecuteError, format_error_message, is_transient_error};
    pub use crate::operation::Operation;
    pub use crate::retry::{RetryConfig, RetryConfigBuilder, RetrySettings, calculate_backoff, with_retry};
    pub use crate::retryable::{Retryable, create_retryable};
    pub use crate::safe::{SafeExecutor, SafeOptions, safe_async};
    pub use crate::sink::{Monitor, Notifier, TracingMonitor, TracingNotifier};
}
