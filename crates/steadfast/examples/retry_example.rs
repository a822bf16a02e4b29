//! Example: retrying, reporting, and single-flight execution
//!
//! This example demonstrates:
//! 1. Retrying a flaky call with `with_retry`
//! 2. Stopping early on a permanent error
//! 3. Reporting a terminal failure through `SafeExecutor`
//! 4. Rejecting a double-click with a `Retryable` handle
//!
//! Run with:
//! ```bash
//! RUST_LOG=steadfast=debug cargo run -p steadfast --example retry_example
//! ```

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use steadfast::prelude::*;
use tracing_subscriber::EnvFilter;

/// A simulated API that fails the first few times
struct UnreliableApi {
    attempts: AtomicU32,
    fail_count: u32,
    failure: &'static str,
}

impl UnreliableApi {
    fn new(fail_count: u32, failure: &'static str) -> Self {
        Self {
            attempts: AtomicU32::new(0),
            fail_count,
            failure,
        }
    }

    async fn fetch(&self) -> Result<String, std::io::Error> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);

        if attempt < self.fail_count {
            println!("  Attempt {}: FAILED ({})", attempt + 1, self.failure);
            Err(std::io::Error::other(self.failure))
        } else {
            println!("  Attempt {}: SUCCESS", attempt + 1);
            Ok("API response data".to_string())
        }
    }

    fn total_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

/// Example 1: transient failures are retried
async fn example_transient_retry() -> Result<(), Box<dyn Error>> {
    println!("\n=== Example 1: Retrying a Transient Failure ===\n");

    let config = RetryConfig::builder()
        .max_retries(3)
        .base_delay(Duration::from_millis(100))
        .on_retry(|attempt, err, delay| {
            println!("  Retry {attempt} after {delay:?}: {err}");
        })
        .build();

    let api = UnreliableApi::new(2, "Network timeout");
    let start = Instant::now();

    let result = with_retry(&|| api.fetch(), &config).await?;

    println!("\nResult: {result}");
    println!("Total attempts: {}", api.total_attempts());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100-125ms + 200-250ms");

    Ok(())
}

/// Example 2: permanent failures are returned at once
async fn example_permanent_error() {
    println!("\n=== Example 2: Permanent Error (No Retry) ===\n");

    let api = UnreliableApi::new(u32::MAX, "Unauthorized");
    let result = with_retry(&|| api.fetch(), &RetryConfig::default()).await;

    assert!(result.is_err());
    println!("Total attempts: {}", api.total_attempts());
    println!(
        "User-facing message: {}",
        format_error_message(result.as_ref().err().map(|e| e as &(dyn Error + 'static)), "Please sign in again.")
    );
}

/// Example 3: terminal failures reach the monitor and the user
async fn example_safe_execution() {
    println!("\n=== Example 3: Safe Execution ===\n");

    let executor = SafeExecutor::new(
        Arc::new(|err: &(dyn Error + 'static)| println!("  [monitor] captured: {err}")),
        Arc::new(TracingNotifier),
    );
    let options = SafeOptions::new()
        .with_notification()
        .with_error_message("Could not load laws")
        .with_on_error(|err| println!("  [on_error] {err}"));

    let api = UnreliableApi::new(u32::MAX, "Server returned 404");
    let result = executor.run(&|| api.fetch(), &options).await;

    println!("Returned error: {:?}", result.err());
}

/// Example 4: a second execute while the first is in flight is rejected
async fn example_single_flight() {
    println!("\n=== Example 4: Single-Flight Retryable ===\n");

    let reload = Arc::new(create_retryable(|| async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok::<_, std::io::Error>("reloaded")
    }));

    let first = {
        let reload = Arc::clone(&reload);
        tokio::spawn(async move { reload.execute().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    match reload.execute().await {
        Err(err) if err.is_in_progress() => println!("  Second click: {err}"),
        other => println!("  Second click: unexpected {other:?}"),
    }

    if let Ok(Ok(value)) = first.await {
        println!("  First click: {value}");
    }
    println!("  Executing now: {}", reload.is_executing());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("==============================================");
    println!("   Steadfast: Resilient Execution Examples");
    println!("==============================================");

    example_transient_retry().await?;
    example_permanent_error().await;
    example_safe_execution().await;
    example_single_flight().await;

    println!("\n==============================================");
    println!("   All examples completed successfully!");
    println!("==============================================\n");

    Ok(())
}
