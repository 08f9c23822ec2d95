//! Retry strategies, configuration and the sequential retry executor.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - How long to wait between attempts
//! - [`ExponentialBackoff`] - Exponential backoff with jitter
//! - [`RetryConfig`] - The configuration bag handed to a [`Retrier`]
//! - [`Retrier`] - Runs the attempts
//! - [`RetryError`] - Why the retrier gave up
//!
//! # Examples
//!
//! ```rust
//! use attempt_core::retry::{ConstantBackoff, Retrier, RetryConfig};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let calls = Arc::new(AtomicU32::new(0));
//! let config = RetryConfig::new().backoff(ConstantBackoff::new(Duration::from_millis(10)));
//!
//! let result = Retrier::new(2, config)
//!     .run(|| {
//!         let calls = Arc::clone(&calls);
//!         async move {
//!             calls.fetch_add(1, Ordering::SeqCst);
//!             Err::<(), _>(std::io::Error::other("down"))
//!         }
//!     })
//!     .await;
//!
//! assert!(result.is_err());
//! assert_eq!(calls.load(Ordering::SeqCst), 3);
//! # }
//! ```

mod config;
mod error;
mod executor;
mod exponential;
mod settings;
mod strategy;

pub use config::{FailedAttempt, RetryConfig};
pub use error::RetryError;
pub use executor::Retrier;
pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use settings::BackoffSettings;
pub use strategy::{BackoffStrategy, ConstantBackoff};
