//! Single-flight handles around a reusable operation.
//!
//! A [`Retryable`] is created once per logical action (a "load laws" button,
//! a "retry" link) and executed as often as the user asks. At most one
//! execution runs at a time per handle; handles share no state with each
//! other.

use crate::error::ExecuteError;
use crate::operation::Operation;
use crate::safe::{SafeExecutor, SafeOptions};
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Build a [`Retryable`] with default options and tracing-backed sinks.
pub fn create_retryable<O>(operation: O) -> Retryable<O>
where
    O: Operation,
{
    Retryable::new(operation)
}

/// A stateful, single-flight wrapper around an [`Operation`].
///
/// Each [`execute`](Self::execute) runs the operation through a
/// [`SafeExecutor`] and records the outcome in [`last_error`](Self::last_error).
/// Calling `execute` while a previous call is still in flight resolves
/// immediately to [`ExecuteError::InProgress`] without running the operation.
///
/// # Examples
///
/// ```rust
/// use steadfast::retryable::create_retryable;
///
/// # async fn example() {
/// let reload = create_retryable(|| async { Ok::<_, std::io::Error>(vec!["law"]) });
///
/// let laws = reload.execute().await.unwrap();
/// assert_eq!(laws, vec!["law"]);
/// assert!(reload.last_error().is_none());
/// assert!(!reload.is_executing());
/// # }
/// ```
pub struct Retryable<O: Operation> {
    operation: O,
    options: SafeOptions,
    executor: SafeExecutor,
    executing: AtomicBool,
    last_error: Mutex<Option<Arc<O::Error>>>,
}

impl<O: Operation> Retryable<O> {
    /// Wrap `operation` with default options and tracing-backed sinks.
    pub fn new(operation: O) -> Self {
        Self::with_options(operation, SafeOptions::default())
    }

    /// Wrap `operation`, running every execution with `options`.
    pub fn with_options(operation: O, options: SafeOptions) -> Self {
        Self::with_executor(operation, options, SafeExecutor::default())
    }

    /// Wrap `operation`, reporting failures to `executor`'s sinks.
    pub fn with_executor(operation: O, options: SafeOptions, executor: SafeExecutor) -> Self {
        Self {
            operation,
            options,
            executor,
            executing: AtomicBool::new(false),
            last_error: Mutex::new(None),
        }
    }

    /// Run the operation unless a previous execution is still in flight.
    ///
    /// The in-flight flag is claimed when this method is called, not when
    /// the returned future is first polled, and released when that future
    /// completes or is dropped. `last_error` is updated before the flag is
    /// released.
    pub fn execute(&self) -> impl Future<Output = Result<O::Output, ExecuteError<O::Error>>> + Send {
        let flight = InFlight::claim(&self.executing);

        async move {
            let Some(_flight) = flight else {
                tracing::debug!("execution already in progress");
                return Err(ExecuteError::InProgress);
            };

            match self.executor.run(&self.operation, &self.options).await {
                Ok(value) => {
                    self.record(None);
                    Ok(value)
                }
                Err(err) => {
                    let err = Arc::new(err);
                    self.record(Some(Arc::clone(&err)));
                    Err(ExecuteError::Failed(err))
                }
            }
        }
    }

    /// The error from the most recent execution, or `None` if it succeeded
    /// (or nothing has run yet).
    pub fn last_error(&self) -> Option<Arc<O::Error>> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether an execution is currently in flight.
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::Acquire)
    }

    fn record(&self, error: Option<Arc<O::Error>>) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }
}

impl<O: Operation> fmt::Debug for Retryable<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retryable")
            .field("options", &self.options)
            .field("executing", &self.is_executing())
            .field("last_error", &self.last_error())
            .finish_non_exhaustive()
    }
}

/// Claim on a handle's in-flight flag; releases it on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
