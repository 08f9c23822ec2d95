//! The tagged outcome returned instead of an error.
//!
//! # Wire format
//!
//! ```text
//! success:          { "success": true,  "data": <T>,  "error": null }
//! internal failure: { "success": false, "data": null, "error": { "raw": .., "normalized": .. } }
//! client failure:   { "success": false, "data": null, "error": { "client": .. } }
//! ```
//!
//! The discriminant plus the key-set of `error` identify the shape; no type
//! names travel on the wire.

use crate::caught::RawError;
use crate::error::OutcomeError;
use crate::interchange::OutcomeShape;
use crate::normalize::ToClient;
use serde::de::{self, DeserializeOwned};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Success with data, or one of the two failure shapes.
pub enum Outcome<T, N: ToClient> {
    /// The operation produced `data`.
    Success {
        /// The operation's value, unchanged.
        data: T,
    },
    /// The operation failed.
    Failure {
        /// The failure payload.
        error: Failure<N>,
    },
}

/// Failure payload: full internal detail, or the client-safe projection only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    untagged,
    bound(
        serialize = "N: Serialize, N::Client: Serialize",
        deserialize = "N: Deserialize<'de>, N::Client: Deserialize<'de>"
    )
)]
pub enum Failure<N: ToClient> {
    /// Raw cause plus normalized error, for privileged contexts.
    Internal {
        /// The caught value, coerced to an error-like shape.
        raw: RawError,
        /// The normalized domain error.
        normalized: N,
    },
    /// Client-safe projection only.
    Client {
        /// The normalized error's client projection.
        client: N::Client,
    },
}

impl<T, N: ToClient> Outcome<T, N> {
    /// Wrap `data` as a success.
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Wrap a failure payload.
    pub fn failure(error: Failure<N>) -> Self {
        Self::Failure { error }
    }

    /// The discriminant.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether this is any kind of failure.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The success data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// The failure payload, if any.
    pub fn error(&self) -> Option<&Failure<N>> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Convert into a standard `Result`.
    pub fn into_result(self) -> Result<T, Failure<N>> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }

    /// Map the success data, leaving failures untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U, N>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { data } => Outcome::Success { data: f(data) },
            Self::Failure { error } => Outcome::Failure { error },
        }
    }
}

// Manual impls: derives would miss the `N::Client` bounds `Failure<N>` needs.
impl<T, N> fmt::Debug for Outcome<T, N>
where
    T: fmt::Debug,
    N: ToClient + fmt::Debug,
    N::Client: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { data } => f.debug_struct("Success").field("data", data).finish(),
            Self::Failure { error } => f.debug_struct("Failure").field("error", error).finish(),
        }
    }
}

impl<T, N> Clone for Outcome<T, N>
where
    T: Clone,
    N: ToClient + Clone,
    N::Client: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::Success { data } => Self::Success { data: data.clone() },
            Self::Failure { error } => Self::Failure {
                error: error.clone(),
            },
        }
    }
}

impl<T, N> PartialEq for Outcome<T, N>
where
    T: PartialEq,
    N: ToClient + PartialEq,
    N::Client: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Success { data: a }, Self::Success { data: b }) => a == b,
            (Self::Failure { error: a }, Self::Failure { error: b }) => a == b,
            _ => false,
        }
    }
}

impl<T, N: ToClient> From<Outcome<T, N>> for Result<T, Failure<N>> {
    fn from(outcome: Outcome<T, N>) -> Self {
        outcome.into_result()
    }
}

impl<N: ToClient> Failure<N> {
    /// Build the two-field internal payload.
    pub fn internal(raw: RawError, normalized: N) -> Self {
        Self::Internal { raw, normalized }
    }

    /// Build the one-field client payload.
    pub fn client(client: N::Client) -> Self {
        Self::Client { client }
    }

    /// Whether this is the client-safe shape.
    pub fn is_client(&self) -> bool {
        matches!(self, Self::Client { .. })
    }

    /// The coerced raw cause (internal shape only).
    pub fn raw(&self) -> Option<&RawError> {
        match self {
            Self::Internal { raw, .. } => Some(raw),
            Self::Client { .. } => None,
        }
    }

    /// The normalized error (internal shape only).
    pub fn normalized(&self) -> Option<&N> {
        match self {
            Self::Internal { normalized, .. } => Some(normalized),
            Self::Client { .. } => None,
        }
    }

    /// The client projection (client shape only).
    pub fn as_client(&self) -> Option<&N::Client> {
        match self {
            Self::Internal { .. } => None,
            Self::Client { client } => Some(client),
        }
    }

    /// Drop internal detail, keeping only the client projection.
    pub fn into_client(self) -> Self {
        match self {
            Self::Internal { normalized, .. } => Self::Client {
                client: normalized.to_client(),
            },
            client @ Self::Client { .. } => client,
        }
    }
}

impl<T, N> Serialize for Outcome<T, N>
where
    T: Serialize,
    N: ToClient + Serialize,
    N::Client: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 3)?;
        match self {
            Self::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
                state.serialize_field("error", &None::<()>)?;
            }
            Self::Failure { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("data", &None::<()>)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

// Validated as a JSON value first, so the payload key-set must be exactly
// `{raw, normalized}` or `{client}` before any typed field is read.
impl<'de, T, N> Deserialize<'de> for Outcome<T, N>
where
    T: DeserializeOwned,
    N: ToClient + DeserializeOwned,
    N::Client: DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let shape = OutcomeShape::of(&value).map_err(de::Error::custom)?;
        let Value::Object(mut object) = value else {
            return Err(de::Error::custom(OutcomeError::NotAnObject));
        };
        let data = object.remove("data").unwrap_or(Value::Null);
        let error = object.remove("error").unwrap_or(Value::Null);

        match shape {
            // `null` data only fits unit-like types
            OutcomeShape::Success => T::deserialize(data)
                .map(Self::success)
                .map_err(de::Error::custom),
            OutcomeShape::InternalFailure | OutcomeShape::ClientFailure => {
                Failure::<N>::deserialize(error)
                    .map(Self::failure)
                    .map_err(de::Error::custom)
            }
        }
    }
}
