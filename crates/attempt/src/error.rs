//! Error types for outcome interchange.

use thiserror::Error;

/// Result type alias for outcome interchange operations.
pub type Result<T> = std::result::Result<T, OutcomeError>;

/// A serialized outcome whose shape breaks the outcome invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutcomeError {
    /// The value is not a structured object.
    #[error("outcome must be an object")]
    NotAnObject,

    /// The `success` discriminant is missing or not a boolean.
    #[error("outcome is missing a boolean `success` discriminant")]
    MissingDiscriminant,

    /// A successful outcome carries a failure payload.
    #[error("successful outcome must not carry an error payload")]
    UnexpectedPayload,

    /// A failed outcome carries non-null data.
    #[error("failed outcome must not carry data")]
    UnexpectedData,

    /// A failed outcome has no failure payload.
    #[error("failed outcome is missing its error payload")]
    MissingPayload,

    /// The failure payload's keys match neither failure shape.
    #[error("error payload keys [{0}] match neither {{raw, normalized}} nor {{client}}")]
    UnknownPayload(String),
}
