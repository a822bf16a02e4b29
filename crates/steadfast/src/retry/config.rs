//! Per-call retry configuration.

use super::backoff::{DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, calculate_backoff};
use crate::error::is_transient_error;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Predicate deciding whether a failed attempt may be retried.
pub type ShouldRetry = Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>;

/// Hook called before each retry with `(attempt, error, delay)`.
///
/// `attempt` is 1-based: the first retry reports `1`.
pub type OnRetry = Arc<dyn Fn(u32, &(dyn Error + 'static), Duration) + Send + Sync>;

/// Retry configuration for [`with_retry`](super::with_retry).
///
/// Delays grow as `base_delay * 2^attempt`, capped at `max_delay`, with up
/// to 25% jitter on top (see [`calculate_backoff`]).
///
/// # Examples
///
/// ```rust
/// use steadfast::retry::RetryConfig;
/// use std::time::Duration;
///
/// // Defaults: max_retries=3, base=1s, max=10s, transient errors only
/// let config = RetryConfig::default();
/// assert_eq!(config.max_retries(), 3);
///
/// let config = RetryConfig::builder()
///     .max_retries(5)
///     .base_delay(Duration::from_millis(200))
///     .max_delay(Duration::from_secs(5))
///     .should_retry(|err| err.to_string().contains("busy"))
///     .on_retry(|attempt, err, delay| {
///         eprintln!("retry #{attempt} in {delay:?}: {err}");
///     })
///     .build();
/// assert_eq!(config.total_attempts(), 6);
/// ```
#[derive(Clone)]
pub struct RetryConfig {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    should_retry: ShouldRetry,
    on_retry: Option<OnRetry>,
}

impl RetryConfig {
    /// Create a new builder.
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Retries allowed after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Attempts possible in total (`max_retries + 1`).
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the first retry.
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Cap on the un-jittered delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Whether `error` may be retried under this configuration.
    pub fn should_retry(&self, error: &(dyn Error + 'static)) -> bool {
        (self.should_retry)(error)
    }

    /// The jittered delay before retry number `attempt` (0-indexed).
    pub fn next_delay(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay, self.max_delay)
    }

    pub(crate) fn notify_retry(&self, attempt: u32, error: &(dyn Error + 'static), delay: Duration) {
        if let Some(on_retry) = &self.on_retry {
            on_retry(attempt, error, delay);
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfigBuilder::default().build()
    }
}

impl fmt::Debug for RetryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("on_retry", &self.on_retry.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RetryConfig`].
///
/// Unset fields fall back to the defaults listed on each setter.
#[derive(Default)]
pub struct RetryConfigBuilder {
    max_retries: Option<u32>,
    base_delay: Option<Duration>,
    max_delay: Option<Duration>,
    should_retry: Option<ShouldRetry>,
    on_retry: Option<OnRetry>,
}

impl RetryConfigBuilder {
    /// Set the number of retries after the initial attempt.
    ///
    /// Default: 3
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the delay before the first retry.
    ///
    /// Default: 1s
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Set the cap on the un-jittered delay.
    ///
    /// Default: 10s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the retry predicate.
    ///
    /// Default: [`is_transient_error`]
    pub fn should_retry<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Arc::new(predicate));
        self
    }

    /// Set a hook called before every retry.
    ///
    /// Default: none
    pub fn on_retry<H>(mut self, hook: H) -> Self
    where
        H: Fn(u32, &(dyn Error + 'static), Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Build the `RetryConfig`.
    pub fn build(self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            base_delay: self.base_delay.unwrap_or(DEFAULT_BASE_DELAY),
            max_delay: self.max_delay.unwrap_or(DEFAULT_MAX_DELAY),
            should_retry: self.should_retry.unwrap_or_else(transient_only),
            on_retry: self.on_retry,
        }
    }
}

fn transient_only() -> ShouldRetry {
    Arc::new(|err: &(dyn Error + 'static)| is_transient_error(err))
}
