use thiserror::Error;

/// Why a [`Retrier`](super::Retrier) stopped without a success.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every allowed attempt failed; `last` is the final attempt's error.
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// Error from the last attempt.
        last: E,
    },

    /// The abort predicate matched an error.
    #[error("aborted on attempt {attempt}: {error}")]
    Aborted {
        /// 1-based attempt that produced the error.
        attempt: u32,
        /// The error that matched the predicate.
        error: E,
    },

    /// The cancellation signal fired.
    #[error("retry cancelled after {attempts} attempt(s)")]
    Cancelled {
        /// Number of attempts started before cancellation.
        attempts: u32,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts that were started.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. } | Self::Cancelled { attempts } => *attempts,
            Self::Aborted { attempt, .. } => *attempt,
        }
    }

    /// Whether the signal stopped the retrier.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// The operation's own error, if the retrier stopped because of one.
    ///
    /// Returns `Err(self)` for cancellation, which has no operation error.
    pub fn into_operation_error(self) -> Result<E, Self> {
        match self {
            Self::Exhausted { last, .. } => Ok(last),
            Self::Aborted { error, .. } => Ok(error),
            cancelled @ Self::Cancelled { .. } => Err(cancelled),
        }
    }
}
