//! The retry loop.

use super::config::RetryConfig;
use crate::operation::Operation;

/// Execute an operation, retrying failures the config allows.
///
/// The operation is called until it succeeds, fails with an error the
/// config's predicate rejects, or has been attempted `max_retries + 1` times.
/// Attempts are strictly sequential: the next one starts only after the
/// previous failure's hook and delay have completed.
///
/// On failure the error of the last attempt is returned as-is, never wrapped.
///
/// # Examples
///
/// ```rust
/// use steadfast::retry::{RetryConfig, with_retry};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), std::io::Error> {
/// let config = RetryConfig::builder()
///     .base_delay(Duration::from_millis(10))
///     .build();
///
/// let attempts = Arc::new(AtomicU32::new(0));
/// let value = with_retry(
///     &|| {
///         let attempts = Arc::clone(&attempts);
///         async move {
///             if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
///                 Err(std::io::Error::other("Network error"))
///             } else {
///                 Ok("ok")
///             }
///         }
///     },
///     &config,
/// )
/// .await?;
///
/// assert_eq!(value, "ok");
/// assert_eq!(attempts.load(Ordering::SeqCst), 3);
/// # Ok(())
/// # }
/// ```
pub async fn with_retry<O>(operation: &O, config: &RetryConfig) -> Result<O::Output, O::Error>
where
    O: Operation,
{
    let mut attempt = 0;
    loop {
        match operation.run().await {
            Ok(result) => return Ok(result),
            Err(err) if attempt >= config.max_retries() => {
                tracing::warn!(
                    attempts = attempt + 1,
                    error = %err,
                    "retries exhausted"
                );
                return Err(err);
            }
            Err(err) if !config.should_retry(&err) => {
                tracing::warn!(
                    attempts = attempt + 1,
                    error = %err,
                    "permanent error, not retrying"
                );
                return Err(err);
            }
            Err(err) => {
                let delay = config.next_delay(attempt);
                tracing::debug!(
                    retry = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "scheduling retry"
                );
                config.notify_retry(attempt + 1, &err, delay);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
