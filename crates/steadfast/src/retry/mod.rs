//! Retry execution with exponential backoff and jitter.
//!
//! # Key Types
//!
//! - [`with_retry`] - drives an [`Operation`](crate::operation::Operation) until it settles
//! - [`RetryConfig`] - retry budget, delays, predicate, and hook
//! - [`calculate_backoff`] - the delay schedule on its own
//! - [`RetrySettings`] - the serializable part of a config
//!
//! # Examples
//!
//! ```rust
//! use steadfast::retry::{RetryConfig, with_retry};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), std::io::Error> {
//! let config = RetryConfig::builder()
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(100))
//!     .build();
//!
//! let result = with_retry(&|| async {
//!     // Your operation here
//!     Ok::<_, std::io::Error>(42)
//! }, &config).await?;
//! # Ok(())
//! # }
//! ```

mod backoff;
mod config;
mod executor;
mod settings;

pub use backoff::{DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, calculate_backoff, capped_delay};
pub use config::{DEFAULT_MAX_RETRIES, OnRetry, RetryConfig, RetryConfigBuilder, ShouldRetry};
pub use executor::with_retry;
pub use settings::RetrySettings;
