#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Run fallible operations and get a tagged, serializable outcome back.
//!
//! An [`Attempt`] runs a synchronous or asynchronous operation and never
//! lets its failure escape. Every call produces an [`Outcome`]:
//!
//! - **Success** carrying the operation's data unchanged
//! - **Internal failure** carrying the raw cause and the normalized error
//! - **Client failure** carrying only the normalized error's client-safe
//!   projection
//!
//! Failures pass through a pluggable [`Normalize`] implementation, then a
//! logger and a reporter, before they are shaped. [`Attempt::retry`] repeats
//! an async operation through the [`attempt_core`] retrier and classifies only
//! the final failure.
//!
//! # Examples
//!
//! ```rust
//! use attempt::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let attempt = Attempt::builder(DefaultNormalizer::new())
//!     .logger(TracingLogger)
//!     .build();
//!
//! let outcome = attempt
//!     .retry_with(
//!         || async { Err::<u32, _>("upstream unavailable") },
//!         RetryOptions::new()
//!             .tries(2)
//!             .client(true)
//!             .retry(RetryConfig::new().backoff(ConstantBackoff::new(Duration::from_millis(10)))),
//!     )
//!     .await;
//!
//! let client = outcome.error().and_then(Failure::as_client).unwrap();
//! assert_eq!(client.code, "INTERNAL_ERROR");
//! # }
//! ```

pub mod caught;
pub mod error;
pub mod interchange;
pub mod normalize;
pub mod options;
pub mod outcome;
pub mod report;
mod runner;

pub use caught::{BoxError, Caught, RawError};
pub use error::{OutcomeError, Result};
pub use interchange::{Interchange, OutcomeShape};
pub use normalize::{
    ClientError, Classifier, DefaultNormalizer, INTERNAL_ERROR, Normalize, NormalizeContext,
    NormalizeFn, NormalizedError, PANIC, ToClient, normalize_fn,
};
pub use options::{DEFAULT_TRIES, RetryOptions, TryOptions};
pub use outcome::{Failure, Outcome};
pub use report::{ErrorLogger, LogFn, Reporter, TracingLogger, log_fn};
pub use runner::{Attempt, AttemptBuilder, AttemptConfig, AttemptOutcome};

pub use attempt_core::{
    BackoffSettings, BackoffStrategy, CancellationToken, ConstantBackoff, ExponentialBackoff,
    FailedAttempt, RetryConfig, RetryError,
};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use attempt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Attempt, CancellationToken, ConstantBackoff, DefaultNormalizer, ExponentialBackoff,
        Failure, Interchange, Normalize, NormalizedError, Outcome, RetryConfig, RetryOptions,
        ToClient, TracingLogger, TryOptions,
    };
}
