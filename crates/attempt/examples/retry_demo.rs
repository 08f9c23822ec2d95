//! Retrying a flaky operation
//!
//! This example runs an operation that fails twice before succeeding, then
//! one that never succeeds, and prints the serialized outcomes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example retry_demo
//!
//! # With the engine's debug events
//! RUST_LOG=attempt=debug,attempt_core=debug cargo run --example retry_demo
//! ```

use attempt::prelude::*;
use attempt::{BackoffSettings, Caught, RetryConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🚀 Retry demo\n");

    let attempt = Attempt::builder(DefaultNormalizer::new())
        .logger(TracingLogger)
        .reporter(|caught| println!("📣 reported: {}", caught))
        .build();

    // Delays usually come from configuration
    let settings: BackoffSettings =
        serde_json::from_str(r#"{ "initial_delay_ms": 50, "jitter": 0.0 }"#)?;
    let retry = || {
        RetryConfig::<Caught>::from_settings(&settings).on_failed_attempt(|failed| {
            println!(
                "   attempt {} failed ({} retries left): {}",
                failed.attempt_number, failed.retries_left, failed.error
            );
        })
    };

    println!("🔁 Flaky operation, 3 tries...");
    let calls = Arc::new(AtomicU32::new(0));
    let outcome = attempt
        .retry_with(
            || {
                let calls = Arc::clone(&calls);
                async move {
                    match calls.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err("upstream busy"),
                        n => Ok(format!("answered on call {}", n + 1)),
                    }
                }
            },
            RetryOptions::new().retry(retry()),
        )
        .await;
    println!("✅ {}\n", outcome.to_json_string()?);

    println!("🔁 Broken operation, 1 try, client-safe result...");
    let outcome = attempt
        .retry_with(
            || async { Err::<(), _>(std::io::Error::other("connection refused")) },
            RetryOptions::new().tries(1).client(true).retry(retry()),
        )
        .await;
    println!("❌ {}\n", outcome.to_json_string()?);

    println!("✨ Example completed successfully!");

    Ok(())
}
