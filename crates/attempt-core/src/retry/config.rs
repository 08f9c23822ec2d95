//! The configuration bag handed to a [`Retrier`](super::Retrier).

use super::exponential::ExponentialBackoff;
use super::settings::BackoffSettings;
use super::strategy::BackoffStrategy;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type FailedAttemptHook<E> = Arc<dyn Fn(&FailedAttempt<'_, E>) + Send + Sync>;
type AbortPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Context passed to the per-attempt failure callback.
#[derive(Debug)]
pub struct FailedAttempt<'a, E> {
    /// The error the attempt failed with.
    pub error: &'a E,
    /// 1-based number of the attempt that just failed.
    pub attempt_number: u32,
    /// How many more attempts the retrier may still make.
    pub retries_left: u32,
}

/// How a [`Retrier`](super::Retrier) waits, reports and stops.
///
/// Everything here is optional; the default is an [`ExponentialBackoff`]
/// with no signal and no hooks.
///
/// # Examples
///
/// ```rust
/// use attempt_core::retry::{ConstantBackoff, RetryConfig};
/// use tokio_util::sync::CancellationToken;
/// use std::time::Duration;
///
/// let signal = CancellationToken::new();
/// let config = RetryConfig::<std::io::Error>::new()
///     .backoff(ConstantBackoff::new(Duration::from_millis(50)))
///     .signal(signal.clone())
///     .on_failed_attempt(|failed| {
///         eprintln!("attempt {} failed: {}", failed.attempt_number, failed.error);
///     })
///     .should_abort(|error| error.kind() == std::io::ErrorKind::PermissionDenied);
///
/// // Stops the retrier at its next checkpoint.
/// signal.cancel();
/// ```
pub struct RetryConfig<E> {
    backoff: Arc<dyn BackoffStrategy>,
    signal: Option<CancellationToken>,
    on_failed_attempt: Option<FailedAttemptHook<E>>,
    should_abort: Option<AbortPredicate<E>>,
}

impl<E> RetryConfig<E> {
    /// Create a configuration with the default exponential backoff.
    pub fn new() -> Self {
        Self {
            backoff: Arc::new(ExponentialBackoff::default()),
            signal: None,
            on_failed_attempt: None,
            should_abort: None,
        }
    }

    /// Create a configuration whose backoff is built from file settings.
    pub fn from_settings(settings: &BackoffSettings) -> Self {
        Self::new().backoff(settings.build())
    }

    /// Replace the delay strategy.
    pub fn backoff(mut self, backoff: impl BackoffStrategy + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Stop retrying once `signal` is cancelled.
    ///
    /// The signal is checked before every attempt and raced against both the
    /// running attempt and the backoff sleep.
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Call `hook` after every failed attempt, before waiting out the backoff.
    pub fn on_failed_attempt<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FailedAttempt<'_, E>) + Send + Sync + 'static,
    {
        self.on_failed_attempt = Some(Arc::new(hook));
        self
    }

    /// Give up immediately when `predicate` returns `true` for an error.
    pub fn should_abort<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.should_abort = Some(Arc::new(predicate));
        self
    }

    pub(crate) fn strategy(&self) -> &dyn BackoffStrategy {
        self.backoff.as_ref()
    }

    pub(crate) fn cancellation(&self) -> Option<&CancellationToken> {
        self.signal.as_ref()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.signal
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    pub(crate) fn aborts_on(&self, error: &E) -> bool {
        self.should_abort
            .as_ref()
            .is_some_and(|predicate| predicate(error))
    }

    pub(crate) fn notify_failed(&self, failed: &FailedAttempt<'_, E>) {
        if let Some(hook) = &self.on_failed_attempt {
            hook(failed);
        }
    }
}

impl<E> Default for RetryConfig<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        Self {
            backoff: Arc::clone(&self.backoff),
            signal: self.signal.clone(),
            on_failed_attempt: self.on_failed_attempt.clone(),
            should_abort: self.should_abort.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("backoff", &self.backoff)
            .field("signal", &self.signal)
            .field("on_failed_attempt", &self.on_failed_attempt.is_some())
            .field("should_abort", &self.should_abort.is_some())
            .finish()
    }
}
