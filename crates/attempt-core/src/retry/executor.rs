//! Sequential retry execution.

use super::config::{FailedAttempt, RetryConfig};
use super::error::RetryError;
use std::future::Future;

/// Runs an async operation until it succeeds or the configuration says stop.
///
/// Attempts never overlap: each attempt's future is driven to completion (or
/// dropped on cancellation) before the backoff delay for the next one starts.
///
/// # Examples
///
/// ```rust
/// use attempt_core::retry::{ConstantBackoff, Retrier, RetryConfig};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # async fn example() {
/// let calls = Arc::new(AtomicU32::new(0));
/// let retrier = Retrier::new(
///     5,
///     RetryConfig::new().backoff(ConstantBackoff::new(Duration::from_millis(1))),
/// );
///
/// let value = retrier
///     .run(|| {
///         let calls = Arc::clone(&calls);
///         async move {
///             if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///                 Err(std::io::Error::other("retry me"))
///             } else {
///                 Ok(42)
///             }
///         }
///     })
///     .await
///     .unwrap();
///
/// assert_eq!(value, 42);
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Retrier<E> {
    max_retries: u32,
    config: RetryConfig<E>,
}

impl<E> Retrier<E> {
    /// Create a retrier making at most `max_retries + 1` attempts.
    pub fn new(max_retries: u32, config: RetryConfig<E>) -> Self {
        Self {
            max_retries,
            config,
        }
    }

    /// Maximum number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Run `operation` until it succeeds, is aborted, is cancelled, or runs
    /// out of retries.
    ///
    /// # Returns
    /// - `Ok(T)`: The first successful result
    /// - `Err(RetryError)`: Why the retrier gave up
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_retries.saturating_add(1);
        let mut attempt: u32 = 0;

        loop {
            if self.config.is_cancelled() {
                return Err(RetryError::Cancelled { attempts: attempt });
            }
            attempt += 1;

            let result = match self.config.cancellation() {
                Some(signal) => tokio::select! {
                    biased;
                    _ = signal.cancelled() => {
                        return Err(RetryError::Cancelled { attempts: attempt });
                    }
                    result = operation() => result,
                },
                None => operation().await,
            };

            let error = match result {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if self.config.aborts_on(&error) {
                return Err(RetryError::Aborted { attempt, error });
            }

            let retries_left = max_attempts - attempt;
            self.config.notify_failed(&FailedAttempt {
                error: &error,
                attempt_number: attempt,
                retries_left,
            });

            if retries_left == 0 {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            }

            let Some(delay) = self.config.strategy().next_delay(attempt - 1) else {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: error,
                });
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt,
                retries_left,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, backing off"
            );

            match self.config.cancellation() {
                Some(signal) => tokio::select! {
                    biased;
                    _ = signal.cancelled() => {
                        return Err(RetryError::Cancelled { attempts: attempt });
                    }
                    _ = tokio::time::sleep(delay) => {}
                },
                None => tokio::time::sleep(delay).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::{BackoffStrategy, ConstantBackoff, ExponentialBackoff};
    use rstest::rstest;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn fast<E>() -> RetryConfig<E> {
        RetryConfig::new().backoff(ConstantBackoff::new(Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn test_retry_success_on_third_attempt() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = Retrier::new(5, fast())
            .run(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    let current = attempts.fetch_add(1, Ordering::SeqCst);
                    if current < 2 {
                        Err(std::io::Error::other("retry me"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(2, 3)]
    #[case(5, 6)]
    #[tokio::test]
    async fn test_attempt_count_is_retries_plus_one(
        #[case] max_retries: u32,
        #[case] expected: u32,
    ) {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = Retrier::new(max_retries, fast())
            .run(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::other("always fail"))
                }
            })
            .await;

        match result {
            Err(RetryError::Exhausted { attempts: made, last }) => {
                assert_eq!(made, expected);
                assert_eq!(last.to_string(), "always fail");
            }
            other => panic!("Expected Exhausted, got {:?}", other.map(|_| ())),
        }
        assert_eq!(attempts.load(Ordering::SeqCst), expected);
    }

    #[tokio::test]
    async fn test_abort_predicate_stops_immediately() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);
        let config = fast::<std::io::Error>().should_abort(|e| e.to_string().contains("auth"));

        let result = Retrier::new(5, config)
            .run(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::other("auth failed"))
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Aborted { attempt: 1, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_attempt_hook_sees_every_failure() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let config = fast::<String>().on_failed_attempt(move |failed| {
            seen_clone
                .lock()
                .unwrap()
                .push((failed.attempt_number, failed.retries_left, failed.error.clone()));
        });

        let result = Retrier::new(2, config)
            .run(|| async { Err::<(), _>("nope".to_string()) })
            .await;

        assert!(result.is_err());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (1, 2, "nope".to_string()),
                (2, 1, "nope".to_string()),
                (3, 0, "nope".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let signal = CancellationToken::new();
        signal.cancel();
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = Retrier::new(3, fast::<std::io::Error>().signal(signal))
            .run(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled { attempts: 0 })));
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff_stops_promptly() {
        let signal = CancellationToken::new();
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);
        let signal_clone = signal.clone();

        // Long delays: only cancellation can end this quickly.
        let config = RetryConfig::<std::io::Error>::new()
            .backoff(ConstantBackoff::new(Duration::from_secs(3600)))
            .signal(signal.clone());

        let result = Retrier::new(10, config)
            .run(|| {
                let attempts = Arc::clone(&attempts_clone);
                let signal = signal_clone.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    signal.cancel();
                    Err::<(), _>(std::io::Error::other("down"))
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled { attempts: 1 })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_interrupts_running_attempt() {
        let signal = CancellationToken::new();
        let trigger = signal.clone();
        let config = fast::<std::io::Error>().signal(signal);

        let result = Retrier::new(3, config)
            .run(|| {
                let trigger = trigger.clone();
                async move {
                    trigger.cancel();
                    std::future::pending::<Result<(), std::io::Error>>().await
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Cancelled { attempts: 1 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_strategy_none_gives_up_early() {
        #[derive(Debug)]
        struct OneRetry;

        impl BackoffStrategy for OneRetry {
            fn next_delay(&self, attempt: u32) -> Option<Duration> {
                (attempt == 0).then_some(Duration::from_millis(5))
            }
        }

        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = Retrier::new(10, RetryConfig::<std::io::Error>::new().backoff(OneRetry))
            .run(|| {
                let attempts = Arc::clone(&attempts_clone);
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err::<(), _>(std::io::Error::other("down"))
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 2, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_exponential_backoff_waits() {
        let config = RetryConfig::<std::io::Error>::new()
            .backoff(ExponentialBackoff::builder().jitter(0.0).build());
        let start = tokio::time::Instant::now();

        let result = Retrier::new(2, config)
            .run(|| async { Err::<(), _>(std::io::Error::other("down")) })
            .await;

        assert!(result.is_err());
        // 100ms + 200ms of virtual time
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_immediate_success() {
        let result = Retrier::new(3, RetryConfig::<std::io::Error>::default())
            .run(|| async { Ok::<_, std::io::Error>(42) })
            .await;

        assert_eq!(result.unwrap(), 42);
    }
}
