//! The unit of work every executor in this crate drives.

use std::error::Error;
use std::future::Future;

/// A zero-argument asynchronous capability that produces a value or fails.
///
/// Executors call [`Operation::run`] once per attempt. The operation itself
/// is treated as stateless: any state it needs between attempts lives behind
/// its own shared handles.
///
/// Every `Fn() -> impl Future<Output = Result<T, E>>` closure is an
/// operation, so most callers never implement this trait by hand:
///
/// ```rust
/// use steadfast::operation::Operation;
///
/// # async fn example() {
/// let fetch = || async { Ok::<_, std::io::Error>("payload") };
/// assert_eq!(fetch.run().await.unwrap(), "payload");
/// # }
/// ```
///
/// Implement it directly when the operation carries configuration:
///
/// ```rust
/// use steadfast::operation::Operation;
///
/// struct FetchLaw {
///     id: u64,
/// }
///
/// impl Operation for FetchLaw {
///     type Output = String;
///     type Error = std::io::Error;
///
///     async fn run(&self) -> Result<String, std::io::Error> {
///         Ok(format!("law #{}", self.id))
///     }
/// }
/// ```
pub trait Operation: Send + Sync {
    /// Value produced on success.
    type Output: Send;

    /// Error produced on failure.
    type Error: Error + Send + Sync + 'static;

    /// Run one attempt of the operation.
    fn run(&self) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

impl<F, Fut, T, E> Operation for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Error + Send + Sync + 'static,
{
    type Output = T;
    type Error = E;

    fn run(&self) -> impl Future<Output = Result<T, E>> + Send {
        (self)()
    }
}
