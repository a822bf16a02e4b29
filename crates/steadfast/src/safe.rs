//! Result-normalizing execution with monitoring and notification.
//!
//! [`SafeExecutor::run`] is the boundary where an operation's failure is
//! reported: the monitor sees every terminal failure exactly once, the user
//! is notified only on request, and the caller always gets a plain
//! `Result` back.

use crate::operation::Operation;
use crate::retry::{RetryConfig, with_retry};
use crate::retryable::Retryable;
use crate::sink::{Monitor, Notifier, TracingMonitor, TracingNotifier};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Notification text used when neither the options nor the error supply one.
pub const NOTIFICATION_FALLBACK_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Hook called with every terminal failure.
pub type OnError = Arc<dyn Fn(&(dyn Error + 'static)) + Send + Sync>;

/// Options for a single safe execution.
///
/// By default the operation runs once, failures are only reported to the
/// monitor, and no notification is shown.
///
/// # Examples
///
/// ```rust
/// use steadfast::retry::RetryConfig;
/// use steadfast::safe::SafeOptions;
///
/// let options = SafeOptions::new()
///     .with_retry_config(RetryConfig::builder().max_retries(1).build())
///     .with_notification()
///     .with_error_message("Could not load laws")
///     .with_on_error(|err| eprintln!("load failed: {err}"));
/// ```
#[derive(Clone, Default)]
pub struct SafeOptions {
    retry: bool,
    retry_config: RetryConfig,
    show_notification: bool,
    error_message: Option<String>,
    on_error: Option<OnError>,
}

impl SafeOptions {
    /// Options with every feature off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retry transient failures with the default [`RetryConfig`].
    pub fn with_retry(mut self) -> Self {
        self.retry = true;
        self
    }

    /// Retry with a specific config. Enables retrying.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = true;
        self.retry_config = config;
        self
    }

    /// Show a notification when the operation fails.
    pub fn with_notification(mut self) -> Self {
        self.show_notification = true;
        self
    }

    /// Text for the failure notification, overriding the error's own message.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Hook called with the error after every terminal failure.
    pub fn with_on_error<H>(mut self, hook: H) -> Self
    where
        H: Fn(&(dyn Error + 'static)) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Whether failures are retried.
    pub fn retries(&self) -> bool {
        self.retry
    }

    /// Whether a failure shows a notification.
    pub fn notifies(&self) -> bool {
        self.show_notification
    }

    fn notification_message(&self, error: &(dyn Error + 'static)) -> String {
        if let Some(message) = self.error_message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_string();
        }

        let message = error.to_string();
        if message.is_empty() {
            NOTIFICATION_FALLBACK_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl fmt::Debug for SafeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeOptions")
            .field("retry", &self.retry)
            .field("retry_config", &self.retry_config)
            .field("show_notification", &self.show_notification)
            .field("error_message", &self.error_message)
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Runs operations and reports their failures to injected sinks.
///
/// Cloning is cheap; clones share the same sinks.
///
/// # Examples
///
/// ```rust
/// use steadfast::safe::{SafeExecutor, SafeOptions};
/// use steadfast::sink::{TracingMonitor, TracingNotifier};
/// use std::sync::Arc;
///
/// # async fn example() {
/// let executor = SafeExecutor::new(Arc::new(TracingMonitor), Arc::new(TracingNotifier));
///
/// let result = executor
///     .run(&|| async { Err::<(), _>(std::io::Error::other("Not found")) }, &SafeOptions::new())
///     .await;
/// assert!(result.is_err());
/// # }
/// ```
#[derive(Clone)]
pub struct SafeExecutor {
    monitor: Arc<dyn Monitor>,
    notifier: Arc<dyn Notifier>,
}

impl SafeExecutor {
    /// Create an executor reporting to the given sinks.
    pub fn new(monitor: Arc<dyn Monitor>, notifier: Arc<dyn Notifier>) -> Self {
        Self { monitor, notifier }
    }

    /// Run `operation` once, or through [`with_retry`] when the options ask for it.
    ///
    /// On success the value is returned with no side effects. On a terminal
    /// failure, in order:
    ///
    /// 1. the monitor captures the error,
    /// 2. the notifier shows a message, if notifications are enabled,
    /// 3. the `on_error` hook runs, if set.
    ///
    /// The error is then returned unchanged.
    pub async fn run<O>(&self, operation: &O, options: &SafeOptions) -> Result<O::Output, O::Error>
    where
        O: Operation,
    {
        let outcome = if options.retry {
            with_retry(operation, &options.retry_config).await
        } else {
            operation.run().await
        };

        outcome.inspect_err(|err| self.report(err, options))
    }

    /// Build a single-flight [`Retryable`] handle bound to these sinks.
    pub fn retryable<O>(&self, operation: O, options: SafeOptions) -> Retryable<O>
    where
        O: Operation,
    {
        Retryable::with_executor(operation, options, self.clone())
    }

    fn report(&self, error: &(dyn Error + 'static), options: &SafeOptions) {
        self.monitor.capture(error);

        if options.show_notification {
            self.notifier.show_error(&options.notification_message(error));
        }

        if let Some(on_error) = &options.on_error {
            on_error(error);
        }
    }
}

impl Default for SafeExecutor {
    fn default() -> Self {
        Self::new(Arc::new(TracingMonitor), Arc::new(TracingNotifier))
    }
}

impl fmt::Debug for SafeExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeExecutor").finish_non_exhaustive()
    }
}

/// Run `operation` with the default tracing-backed sinks.
///
/// See [`SafeExecutor::run`].
pub async fn safe_async<O>(operation: &O, options: &SafeOptions) -> Result<O::Output, O::Error>
where
    O: Operation,
{
    SafeExecutor::default().run(operation, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        captured: Mutex<Vec<String>>,
        shown: Mutex<Vec<String>>,
    }

    impl Monitor for Recorder {
        fn capture(&self, error: &(dyn Error + 'static)) {
            self.captured.lock().unwrap().push(error.to_string());
        }
    }

    impl Notifier for Recorder {
        fn show_error(&self, message: &str) {
            self.shown.lock().unwrap().push(message.to_string());
        }
    }

    fn executor() -> (Arc<Recorder>, SafeExecutor) {
        let recorder = Arc::new(Recorder::default());
        let executor = SafeExecutor::new(recorder.clone(), recorder.clone());
        (recorder, executor)
    }

    fn counting_failure(
        message: &'static str,
        failures: u32,
    ) -> (
        Arc<AtomicU32>,
        impl Fn() -> std::future::Ready<Result<&'static str, std::io::Error>> + Send + Sync,
    ) {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = Arc::clone(&calls);
        let op = move || {
            let call = calls_clone.fetch_add(1, Ordering::SeqCst);
            if call < failures {
                std::future::ready(Err(std::io::Error::other(message)))
            } else {
                std::future::ready(Ok("success"))
            }
        };
        (calls, op)
    }

    #[tokio::test]
    async fn test_success_has_no_side_effects() {
        let (recorder, executor) = executor();
        let (_, op) = counting_failure("unused", 0);

        let result = executor
            .run(&op, &SafeOptions::new().with_notification())
            .await;

        assert_eq!(result.unwrap(), "success");
        assert!(recorder.captured.lock().unwrap().is_empty());
        assert!(recorder.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_captured_once() {
        let (recorder, executor) = executor();
        let (calls, op) = counting_failure("Test error", u32::MAX);

        let err = executor.run(&op, &SafeOptions::new()).await.unwrap_err();

        assert_eq!(err.to_string(), "Test error");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*recorder.captured.lock().unwrap(), vec!["Test error".to_string()]);
        assert!(recorder.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_uses_error_message() {
        let (recorder, executor) = executor();
        let (_, op) = counting_failure("Test error", u32::MAX);

        let _ = executor
            .run(&op, &SafeOptions::new().with_notification())
            .await;

        assert_eq!(*recorder.shown.lock().unwrap(), vec!["Test error".to_string()]);
    }

    #[tokio::test]
    async fn test_notification_prefers_custom_message() {
        let (recorder, executor) = executor();
        let (_, op) = counting_failure("Original error", u32::MAX);

        let _ = executor
            .run(
                &op,
                &SafeOptions::new()
                    .with_notification()
                    .with_error_message("Custom message"),
            )
            .await;

        assert_eq!(*recorder.shown.lock().unwrap(), vec!["Custom message".to_string()]);
    }

    #[tokio::test]
    async fn test_notification_fallback_for_empty_message() {
        let (recorder, executor) = executor();
        let (_, op) = counting_failure("", u32::MAX);

        let _ = executor
            .run(&op, &SafeOptions::new().with_notification())
            .await;

        assert_eq!(
            *recorder.shown.lock().unwrap(),
            vec!["An unexpected error occurred. Please try again.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_on_error_hook() {
        let (recorder, executor) = executor();
        let (_, op) = counting_failure("Test error", u32::MAX);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let _ = executor
            .run(
                &op,
                &SafeOptions::new().with_on_error(move |err| {
                    seen_clone.lock().unwrap().push(err.to_string());
                }),
            )
            .await;

        assert_eq!(*seen.lock().unwrap(), vec!["Test error".to_string()]);
        assert_eq!(recorder.captured.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_option_recovers_from_transient_error() {
        let (recorder, executor) = executor();
        let (calls, op) = counting_failure("Network error", 1);

        let result = executor.run(&op, &SafeOptions::new().with_retry()).await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(recorder.captured.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retry_exhaustion_is_captured_once() {
        let (recorder, executor) = executor();
        let (calls, op) = counting_failure("Network error", u32::MAX);
        let config = RetryConfig::builder()
            .max_retries(1)
            .base_delay(Duration::from_millis(1))
            .max_delay(Duration::from_millis(1))
            .build();

        let err = executor
            .run(&op, &SafeOptions::new().with_retry_config(config))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Network error");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(recorder.captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_config_attempts_once() {
        let (_, executor) = executor();
        let (calls, op) = counting_failure("Network error", u32::MAX);

        let _ = executor
            .run(
                &op,
                &SafeOptions::new().with_retry_config(RetryConfig::builder().max_retries(0).build()),
            )
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_without_retry_transient_error_runs_once() {
        let (recorder, executor) = executor();
        let (calls, op) = counting_failure("Network error", u32::MAX);

        let _ = executor.run(&op, &SafeOptions::new()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.captured.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_safe_async_with_default_sinks() {
        let op = || async { Ok::<_, std::io::Error>("result") };
        assert_eq!(safe_async(&op, &SafeOptions::default()).await.unwrap(), "result");

        let op = || async { Err::<(), _>(std::io::Error::other("Not found")) };
        let err = safe_async(&op, &SafeOptions::new().with_notification())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn test_options_flags() {
        let options = SafeOptions::new();
        assert!(!options.retries());
        assert!(!options.notifies());

        let options = options.with_retry().with_notification();
        assert!(options.retries());
        assert!(options.notifies());
        assert!(format!("{options:?}").contains("on_error: false"));
    }
}
