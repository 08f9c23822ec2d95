//! The attempt runner: run once, or retry, and always return an [`Outcome`].

use crate::caught::{BoxError, Caught};
use crate::normalize::{DefaultNormalizer, Normalize, NormalizeContext, ToClient};
use crate::options::{RetryOptions, TryOptions};
use crate::outcome::{Failure, Outcome};
use crate::report::{ErrorLogger, Reporter, Reporting, log_fn};
use attempt_core::{Retrier, RetryError};
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;

/// Outcome type produced by an [`Attempt`] using normalizer `N`.
pub type AttemptOutcome<T, N> = Outcome<T, <N as Normalize>::Output>;

/// Dependencies fixed for the lifetime of an [`Attempt`].
pub struct AttemptConfig<N> {
    /// Turns caught values into normalized errors.
    pub normalizer: N,
    /// Invoked first on every reported failure.
    pub logger: Option<Arc<dyn ErrorLogger>>,
    /// Invoked after the logger on every reported failure.
    pub reporter: Option<Reporter>,
}

impl<N> AttemptConfig<N> {
    /// Configuration with a normalizer and no logger or reporter.
    pub fn new(normalizer: N) -> Self {
        Self {
            normalizer,
            logger: None,
            reporter: None,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for AttemptConfig<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttemptConfig")
            .field("normalizer", &self.normalizer)
            .field("logger", &self.logger.is_some())
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}

/// Builder for [`Attempt`].
///
/// Accepts the logger either as an [`ErrorLogger`] object or as a plain
/// function; both end up behind the same call.
pub struct AttemptBuilder<N> {
    config: AttemptConfig<N>,
}

impl<N: Normalize> AttemptBuilder<N> {
    /// Use an object with an `error` operation as the logger.
    pub fn logger(mut self, logger: impl ErrorLogger + 'static) -> Self {
        self.config.logger = Some(Arc::new(logger));
        self
    }

    /// Use a plain function as the logger.
    pub fn log_with<F>(self, log: F) -> Self
    where
        F: Fn(&Caught) + Send + Sync + 'static,
    {
        self.logger(log_fn(log))
    }

    /// Set the reporter, invoked after the logger.
    pub fn reporter<F>(mut self, reporter: F) -> Self
    where
        F: Fn(&Caught) + Send + Sync + 'static,
    {
        self.config.reporter = Some(Arc::new(reporter));
        self
    }

    /// Build the [`Attempt`].
    pub fn build(self) -> Attempt<N> {
        Attempt::new(self.config)
    }
}

struct Shared<N> {
    normalizer: N,
    reporting: Reporting,
}

/// Runs fallible operations and turns every failure into an [`Outcome`].
///
/// Cheap to clone; clones share the normalizer, logger and reporter.
///
/// # Sync and async operations
///
/// A plain operation goes through [`try_sync`](Self::try_sync) and yields an
/// `Outcome` immediately. An operation returning a future goes through
/// [`try_async`](Self::try_async) and yields a future of the same `Outcome`.
/// Both classify failures identically: an `Err` returned by the operation, or
/// a panic raised while it runs (including while its future is polled).
///
/// # Panics
///
/// A caught panic still goes through the process panic hook first, so the
/// default hook prints its message to stderr even though the call returns an
/// `Outcome`. Install a quieter hook with [`std::panic::set_hook`] if that
/// output is unwanted. Panics raised by the logger, reporter or normalizer
/// are not caught and reach the caller.
///
/// # Example
///
/// ```
/// use attempt::{Attempt, TryOptions};
///
/// let attempt = Attempt::default();
///
/// let outcome = attempt.try_sync(|| "42".parse::<u32>());
/// assert_eq!(outcome.data(), Some(&42));
///
/// let outcome = attempt.try_sync_with(|| "x".parse::<u32>(), TryOptions::new().client(true));
/// assert!(outcome.error().unwrap().is_client());
/// ```
pub struct Attempt<N> {
    shared: Arc<Shared<N>>,
}

impl<N> Clone for Attempt<N> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Attempt<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt")
            .field("normalizer", &self.shared.normalizer)
            .field("reporting", &self.shared.reporting)
            .finish()
    }
}

impl Default for Attempt<DefaultNormalizer> {
    fn default() -> Self {
        Self::builder(DefaultNormalizer::new()).build()
    }
}

impl<N: Normalize> Attempt<N> {
    /// Create an attempt runner from its configuration.
    pub fn new(config: AttemptConfig<N>) -> Self {
        let AttemptConfig {
            normalizer,
            logger,
            reporter,
        } = config;
        Self {
            shared: Arc::new(Shared {
                normalizer,
                reporting: Reporting::new(logger, reporter),
            }),
        }
    }

    /// Start building an attempt runner around `normalizer`.
    pub fn builder(normalizer: N) -> AttemptBuilder<N> {
        AttemptBuilder {
            config: AttemptConfig::new(normalizer),
        }
    }

    /// Wrap `data` as a success.
    pub fn ok<T>(&self, data: T) -> AttemptOutcome<T, N> {
        Outcome::success(data)
    }

    /// Wrap a failure payload.
    pub fn error<T>(&self, failure: Failure<N::Output>) -> AttemptOutcome<T, N> {
        Outcome::failure(failure)
    }

    /// Run a synchronous operation once with default options.
    pub fn try_sync<T, E, F>(&self, operation: F) -> AttemptOutcome<T, N>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.try_sync_with(operation, TryOptions::default())
    }

    /// Run a synchronous operation once.
    ///
    /// Returns immediately; never panics because of the operation. A panic in
    /// the operation is still printed by the panic hook.
    pub fn try_sync_with<T, E, F>(&self, operation: F, options: TryOptions) -> AttemptOutcome<T, N>
    where
        F: FnOnce() -> Result<T, E>,
        E: Into<BoxError>,
    {
        match panic::catch_unwind(AssertUnwindSafe(operation)) {
            Ok(Ok(data)) => Outcome::success(data),
            Ok(Err(error)) => self.handle_failure(Caught::from_error(error), &options),
            Err(payload) => self.handle_failure(Caught::from_panic(payload), &options),
        }
    }

    /// Run an asynchronous operation once with default options.
    pub async fn try_async<T, E, F, Fut>(&self, operation: F) -> AttemptOutcome<T, N>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.try_async_with(operation, TryOptions::default()).await
    }

    /// Run an asynchronous operation once.
    ///
    /// A panic while creating the future or while polling it is caught the
    /// same way as an `Err`, after the panic hook has printed it.
    pub async fn try_async_with<T, E, F, Fut>(
        &self,
        operation: F,
        options: TryOptions,
    ) -> AttemptOutcome<T, N>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let result = match start(operation) {
            Ok(future) => drive(future).await,
            Err(caught) => Err(caught),
        };

        match result {
            Ok(data) => Outcome::success(data),
            Err(caught) => self.handle_failure(caught, &options),
        }
    }

    /// Retry an asynchronous operation with default options (`tries = 3`).
    pub async fn retry<T, E, F, Fut>(&self, operation: F) -> AttemptOutcome<T, N>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        self.retry_with(operation, RetryOptions::default()).await
    }

    /// Retry an asynchronous operation.
    ///
    /// The operation runs at most `tries + 1` times, one attempt at a time,
    /// with the delays, hooks and cancellation signal from the options'
    /// retry configuration. Only the final failure is normalized and
    /// reported, exactly as [`try_async_with`](Self::try_async_with) would.
    /// Every panicking attempt is printed by the panic hook.
    pub async fn retry_with<T, E, F, Fut>(
        &self,
        mut operation: F,
        options: RetryOptions,
    ) -> AttemptOutcome<T, N>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let RetryOptions { base, tries, retry } = options;
        let retrier = Retrier::new(tries, retry);

        let result = retrier
            .run(|| {
                let started = start(&mut operation);
                async move {
                    match started {
                        Ok(future) => drive(future).await,
                        Err(caught) => Err(caught),
                    }
                }
            })
            .await;

        match result {
            Ok(data) => Outcome::success(data),
            Err(error) => {
                debug!(
                    attempts = error.attempts(),
                    cancelled = error.is_cancelled(),
                    "retry gave up"
                );
                let caught = match error.into_operation_error() {
                    Ok(last) => last,
                    Err(cancelled) => Caught::from_error::<RetryError<Caught>>(cancelled),
                };
                self.handle_failure(caught, &base)
            }
        }
    }

    /// Normalize, report, then project.
    fn handle_failure<T>(&self, caught: Caught, options: &TryOptions) -> AttemptOutcome<T, N> {
        let normalized = match &options.errors {
            Some(classifier) => {
                let context = NormalizeContext::new(classifier.as_ref());
                self.shared.normalizer.normalize(&caught, Some(&context))
            }
            None => self.shared.normalizer.normalize(&caught, None),
        };

        debug!(
            kind = caught.type_name(),
            report = options.report,
            client = options.client,
            "attempt failed"
        );

        if options.report {
            self.shared.reporting.report(&caught);
        }

        if options.client {
            return Outcome::failure(Failure::client(normalized.to_client()));
        }

        Outcome::failure(Failure::internal(caught.to_raw(), normalized))
    }
}

/// Call the operation, catching a panic raised before any future exists.
fn start<F, Fut>(operation: F) -> Result<Fut, Caught>
where
    F: FnOnce() -> Fut,
{
    panic::catch_unwind(AssertUnwindSafe(operation)).map_err(Caught::from_panic)
}

/// Drive the operation's future, catching its error or panic as [`Caught`].
async fn drive<T, E, Fut>(future: Fut) -> Result<T, Caught>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(error)) => Err(Caught::from_error(error)),
        Err(payload) => Err(Caught::from_panic(payload)),
    }
}
