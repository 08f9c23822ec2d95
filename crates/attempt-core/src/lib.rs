#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Retry collaborator for the attempt ecosystem.
//!
//! This crate owns everything about *repeating* a fallible async operation:
//!
//! - **Delay strategies** via the `BackoffStrategy` trait
//!   - Exponential backoff with jitter
//!   - Constant delays
//! - **A configuration bag** (`RetryConfig`) carrying the delay strategy, a
//!   cancellation signal, a per-attempt failure callback and an abort predicate
//! - **A sequential executor** (`Retrier`) that runs at most `max_retries + 1`
//!   attempts and reports why it stopped through `RetryError`
//!
//! The attempt engine hands its operation to a [`Retrier`] and only looks at
//! the final `Ok`/`Err`.
//!
//! # Examples
//!
//! ```rust
//! use attempt_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), RetryError<std::io::Error>> {
//! let config = RetryConfig::new().backoff(
//!     ExponentialBackoff::builder()
//!         .initial_delay(Duration::from_millis(100))
//!         .build(),
//! );
//!
//! let value = Retrier::new(3, config)
//!     .run(|| async { Ok::<_, std::io::Error>(42) })
//!     .await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

pub mod retry;

pub use retry::{
    BackoffSettings, BackoffStrategy, ConstantBackoff, ExponentialBackoff,
    ExponentialBackoffBuilder, FailedAttempt, Retrier, RetryConfig, RetryError,
};

/// Re-exported so callers can build cancellation signals without a direct
/// `tokio-util` dependency.
pub use tokio_util::sync::CancellationToken;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use attempt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::CancellationToken;
    pub use crate::retry::{
        BackoffSettings, BackoffStrategy, ConstantBackoff, ExponentialBackoff, Retrier,
        RetryConfig, RetryError,
    };
}
