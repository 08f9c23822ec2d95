//! Per-call options for `try_*` and `retry`.

use crate::caught::Caught;
use crate::normalize::Classifier;
use attempt_core::RetryConfig;
use std::fmt;
use std::sync::Arc;

/// Default number of retries after the initial attempt.
pub const DEFAULT_TRIES: u32 = 3;

/// Options for a single attempt.
///
/// Defaults: failures are reported, internal detail is returned, no classifier.
#[derive(Clone)]
pub struct TryOptions {
    pub(crate) report: bool,
    pub(crate) client: bool,
    pub(crate) errors: Option<Classifier>,
}

impl TryOptions {
    /// Create options with the defaults.
    pub fn new() -> Self {
        Self {
            report: true,
            client: false,
            errors: None,
        }
    }

    /// Whether to run the logger and reporter on failure.
    pub fn report(mut self, report: bool) -> Self {
        self.report = report;
        self
    }

    /// Whether to return only the client-safe projection on failure.
    pub fn client(mut self, client: bool) -> Self {
        self.client = client;
        self
    }

    /// Classifier forwarded to the normalizer as its `when` context.
    pub fn errors<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&Caught) -> Option<String> + Send + Sync + 'static,
    {
        self.errors = Some(Arc::new(classifier));
        self
    }
}

impl Default for TryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryOptions")
            .field("report", &self.report)
            .field("client", &self.client)
            .field("errors", &self.errors.is_some())
            .finish()
    }
}

/// Options for a retried attempt.
///
/// `tries` is the number of retries after the first attempt, so the
/// operation runs at most `tries + 1` times. `retry` is handed to the
/// retrier untouched.
#[derive(Clone, Debug)]
pub struct RetryOptions {
    pub(crate) base: TryOptions,
    pub(crate) tries: u32,
    pub(crate) retry: RetryConfig<Caught>,
}

impl RetryOptions {
    /// Create options with the defaults (`tries = 3`).
    pub fn new() -> Self {
        Self {
            base: TryOptions::new(),
            tries: DEFAULT_TRIES,
            retry: RetryConfig::default(),
        }
    }

    /// Maximum number of retries after the initial attempt.
    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Backoff, cancellation and hook configuration for the retrier.
    pub fn retry(mut self, retry: RetryConfig<Caught>) -> Self {
        self.retry = retry;
        self
    }

    /// See [`TryOptions::report`].
    pub fn report(mut self, report: bool) -> Self {
        self.base = self.base.report(report);
        self
    }

    /// See [`TryOptions::client`].
    pub fn client(mut self, client: bool) -> Self {
        self.base = self.base.client(client);
        self
    }

    /// See [`TryOptions::errors`].
    pub fn errors<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&Caught) -> Option<String> + Send + Sync + 'static,
    {
        self.base = self.base.errors(classifier);
        self
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TryOptions> for RetryOptions {
    fn from(base: TryOptions) -> Self {
        Self {
            base,
            ..Self::new()
        }
    }
}
