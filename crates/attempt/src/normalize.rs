//! Error normalization and client-safe projection.
//!
//! A [`Normalize`] implementation turns a [`Caught`] value into the domain's
//! normalized error shape. That shape names its client-safe subset through
//! [`ToClient`], which is the only way a client projection is produced.

use crate::caught::Caught;
use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

/// Code used when nothing classifies a failure.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Code used by [`DefaultNormalizer`] for panics nothing classified.
pub const PANIC: &str = "PANIC";

/// Caller-supplied classifier mapping a caught failure to a domain code.
pub type Classifier = Arc<dyn Fn(&Caught) -> Option<String> + Send + Sync>;

/// A normalized error that can project itself to a client-safe subset.
pub trait ToClient {
    /// The client-safe subset.
    type Client;

    /// Build the client-safe projection. Must not expose internal detail.
    fn to_client(&self) -> Self::Client;
}

/// Auxiliary context handed to a normalizer when the caller supplied a classifier.
#[derive(Clone, Copy)]
pub struct NormalizeContext<'a> {
    when: &'a (dyn Fn(&Caught) -> Option<String> + Send + Sync),
}

impl<'a> NormalizeContext<'a> {
    /// Wrap a classifier.
    pub fn new(when: &'a (dyn Fn(&Caught) -> Option<String> + Send + Sync)) -> Self {
        Self { when }
    }

    /// Ask the caller's classifier for a code.
    pub fn when(&self, caught: &Caught) -> Option<String> {
        (self.when)(caught)
    }
}

impl fmt::Debug for NormalizeContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeContext").finish_non_exhaustive()
    }
}

/// Turns any caught value into a normalized error.
///
/// Implementations must not panic; a panicking normalizer is a contract
/// violation and the panic reaches the caller.
pub trait Normalize: Send + Sync {
    /// The normalized error shape.
    type Output: ToClient;

    /// Normalize `caught`. `context` is present when the call supplied an
    /// `errors` classifier.
    fn normalize(&self, caught: &Caught, context: Option<&NormalizeContext<'_>>) -> Self::Output;
}

/// A normalizer backed by a closure. Built with [`normalize_fn`].
#[derive(Clone)]
pub struct NormalizeFn<F> {
    f: F,
}

/// Use a closure as a [`Normalize`] implementation.
///
/// # Example
///
/// ```
/// use attempt::{normalize_fn, Caught, NormalizeContext, NormalizedError};
///
/// let normalizer = normalize_fn(|caught: &Caught, ctx: Option<&NormalizeContext<'_>>| {
///     let code = ctx.and_then(|ctx| ctx.when(caught)).unwrap_or_else(|| "E_APP".into());
///     NormalizedError::new(code, caught.message())
/// });
/// # let _ = normalizer;
/// ```
pub fn normalize_fn<F, N>(f: F) -> NormalizeFn<F>
where
    F: Fn(&Caught, Option<&NormalizeContext<'_>>) -> N + Send + Sync,
    N: ToClient,
{
    NormalizeFn { f }
}

impl<F, N> Normalize for NormalizeFn<F>
where
    F: Fn(&Caught, Option<&NormalizeContext<'_>>) -> N + Send + Sync,
    N: ToClient,
{
    type Output = N;

    fn normalize(&self, caught: &Caught, context: Option<&NormalizeContext<'_>>) -> N {
        (self.f)(caught, context)
    }
}

impl<F> fmt::Debug for NormalizeFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeFn").finish_non_exhaustive()
    }
}

/// The default normalized error.
///
/// Carries internal detail (type name, cause chain, normalization-site
/// backtrace) next to the fields that are safe to show a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct NormalizedError {
    /// Classification code.
    pub code: String,
    /// Developer-facing message.
    pub message: String,
    /// Message meant for end users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    /// Type name of the caught value.
    #[serde(default)]
    pub name: String,
    /// Messages of the cause chain, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
    /// Backtrace of the normalization site, captured when backtraces are
    /// enabled. It shows where the failure was handled, not where it arose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl NormalizedError {
    /// Create a normalized error with a code and message.
    ///
    /// Operations may return this directly; [`DefaultNormalizer`] keeps it as is.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            user_message: None,
            name: String::new(),
            causes: Vec::new(),
            stack: None,
        }
    }

    /// Set the end-user message.
    pub fn with_user_message(mut self, user_message: impl Into<String>) -> Self {
        self.user_message = Some(user_message.into());
        self
    }
}

impl ToClient for NormalizedError {
    type Client = ClientError;

    fn to_client(&self) -> ClientError {
        ClientError {
            code: self.code.clone(),
            message: self.message.clone(),
            user_message: self.user_message.clone(),
        }
    }
}

/// Client-safe subset of a [`NormalizedError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientError {
    /// Classification code.
    pub code: String,
    /// Message describing the failure.
    pub message: String,
    /// Message meant for end users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
}

/// Normalizer used when the caller has no domain-specific one.
///
/// - A caught [`NormalizedError`] is reused as is.
/// - Otherwise the code comes from the call's classifier, then falls back to
///   [`INTERNAL_ERROR`] ([`PANIC`] for panics).
#[derive(Debug, Clone)]
pub struct DefaultNormalizer {
    fallback_code: String,
}

impl DefaultNormalizer {
    /// Create a normalizer falling back to [`INTERNAL_ERROR`].
    pub fn new() -> Self {
        Self::with_fallback_code(INTERNAL_ERROR)
    }

    /// Create a normalizer falling back to `code` for unclassified errors.
    pub fn with_fallback_code(code: impl Into<String>) -> Self {
        Self {
            fallback_code: code.into(),
        }
    }
}

impl Default for DefaultNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for DefaultNormalizer {
    type Output = NormalizedError;

    fn normalize(
        &self,
        caught: &Caught,
        context: Option<&NormalizeContext<'_>>,
    ) -> NormalizedError {
        if let Some(existing) = caught.downcast_ref::<NormalizedError>() {
            return existing.clone();
        }

        let code = context
            .and_then(|ctx| ctx.when(caught))
            .unwrap_or_else(|| {
                if caught.is_panic() {
                    PANIC.to_owned()
                } else {
                    self.fallback_code.clone()
                }
            });

        let backtrace = Backtrace::capture();
        let stack =
            (backtrace.status() == BacktraceStatus::Captured).then(|| backtrace.to_string());

        NormalizedError {
            code,
            message: caught.message(),
            user_message: None,
            name: caught.type_name().to_owned(),
            causes: caught.causes(),
            stack,
        }
    }
}
