//! Delay strategies used between retry attempts.

use std::fmt;
use std::time::Duration;

/// A strategy deciding how long to wait before the next retry.
///
/// Strategies only own the delay math. How many attempts are made, and when to
/// stop early, is decided by the [`Retrier`](super::Retrier) and its
/// [`RetryConfig`](super::RetryConfig).
///
/// # Examples
///
/// ```rust
/// use attempt_core::retry::BackoffStrategy;
/// use std::time::Duration;
///
/// /// Waits one extra second per failed attempt.
/// #[derive(Debug)]
/// struct LinearBackoff;
///
/// impl BackoffStrategy for LinearBackoff {
///     fn next_delay(&self, attempt: u32) -> Option<Duration> {
///         Some(Duration::from_secs(u64::from(attempt) + 1))
///     }
/// }
///
/// assert_eq!(LinearBackoff.next_delay(0), Some(Duration::from_secs(1)));
/// assert_eq!(LinearBackoff.next_delay(2), Some(Duration::from_secs(3)));
/// ```
pub trait BackoffStrategy: fmt::Debug + Send + Sync {
    /// Calculate the delay before the next retry attempt.
    ///
    /// # Parameters
    /// - `attempt`: The number of retries already performed (0-indexed). The
    ///   delay between the first and second invocation is `next_delay(0)`.
    ///
    /// # Returns
    /// - `Some(Duration)`: Wait this long before the next retry
    /// - `None`: Give up now, even if retries remain
    fn next_delay(&self, attempt: u32) -> Option<Duration>;
}

/// Waits the same amount of time before every retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantBackoff {
    delay: Duration,
}

impl ConstantBackoff {
    /// Create a constant backoff with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Retry immediately, without waiting.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl BackoffStrategy for ConstantBackoff {
    fn next_delay(&self, _attempt: u32) -> Option<Duration> {
        Some(self.delay)
    }
}
