//! JSON interchange for outcomes.
//!
//! Outcomes cross process boundaries as plain JSON. [`Interchange`] gives every
//! serializable type the same small set of conversions, and [`OutcomeShape`]
//! lets a consumer that does not know the Rust types classify a serialized
//! outcome from its discriminant and payload keys alone.

use crate::error::{OutcomeError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON conversions shared by every outcome type.
///
/// Blanket-implemented for all `Serialize + DeserializeOwned` types, so any
/// `Outcome` whose data and error types are serializable gets it for free.
///
/// # Example
///
/// ```
/// use attempt::{Interchange, NormalizedError, Outcome};
///
/// let outcome: Outcome<u32, NormalizedError> = Outcome::success(42);
/// let json = outcome.to_json_string().unwrap();
/// assert_eq!(json, r#"{"success":true,"data":42,"error":null}"#);
///
/// let back = Outcome::<u32, NormalizedError>::from_json_string(&json).unwrap();
/// assert_eq!(back, outcome);
/// ```
pub trait Interchange: Serialize + DeserializeOwned {
    /// Serialize to a JSON value.
    fn to_json_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Deserialize from a JSON value.
    fn from_json_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Serialize to a compact JSON string.
    fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from a JSON string.
    fn from_json_string(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

impl<T> Interchange for T where T: Serialize + DeserializeOwned {}

/// Which outcome shape a serialized value has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeShape {
    /// `success: true`, no error payload.
    Success,
    /// `success: false`, payload keys `{raw, normalized}`.
    InternalFailure,
    /// `success: false`, payload key `{client}`.
    ClientFailure,
}

impl OutcomeShape {
    /// Classify a serialized outcome without knowing its Rust types.
    ///
    /// # Errors
    ///
    /// Returns [`OutcomeError`] when the value violates the outcome invariants.
    ///
    /// # Example
    ///
    /// ```
    /// use attempt::OutcomeShape;
    /// use serde_json::json;
    ///
    /// let client = json!({ "code": "X", "message": "y" });
    /// let value = json!({ "success": false, "data": null, "error": { "client": client } });
    /// assert_eq!(OutcomeShape::of(&value).unwrap(), OutcomeShape::ClientFailure);
    /// ```
    pub fn of(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or(OutcomeError::NotAnObject)?;
        let success = object
            .get("success")
            .and_then(Value::as_bool)
            .ok_or(OutcomeError::MissingDiscriminant)?;
        let payload = object.get("error").filter(|error| !error.is_null());
        let has_data = object.get("data").is_some_and(|data| !data.is_null());

        match (success, payload) {
            (true, None) => Ok(Self::Success),
            (true, Some(_)) => Err(OutcomeError::UnexpectedPayload),
            (false, None) => Err(OutcomeError::MissingPayload),
            (false, Some(_)) if has_data => Err(OutcomeError::UnexpectedData),
            (false, Some(payload)) => {
                let payload = payload.as_object().ok_or(OutcomeError::NotAnObject)?;
                let mut keys: Vec<&str> = payload.keys().map(String::as_str).collect();
                keys.sort_unstable();

                match keys.as_slice() {
                    ["normalized", "raw"] => Ok(Self::InternalFailure),
                    ["client"] => Ok(Self::ClientFailure),
                    other => Err(OutcomeError::UnknownPayload(other.join(", "))),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({ "success": true, "data": 1, "error": null }), OutcomeShape::Success)]
    #[case(json!({ "success": true, "data": null }), OutcomeShape::Success)]
    #[case(
        json!({ "success": false, "data": null, "error": { "raw": {}, "normalized": {} } }),
        OutcomeShape::InternalFailure
    )]
    #[case(
        json!({ "success": false, "data": null, "error": { "client": {} } }),
        OutcomeShape::ClientFailure
    )]
    fn test_shape_classification(#[case] value: Value, #[case] expected: OutcomeShape) {
        assert_eq!(OutcomeShape::of(&value).unwrap(), expected);
    }

    #[rstest]
    #[case(json!([1, 2]), OutcomeError::NotAnObject)]
    #[case(json!({ "data": 1 }), OutcomeError::MissingDiscriminant)]
    #[case(json!({ "success": "yes" }), OutcomeError::MissingDiscriminant)]
    #[case(json!({ "success": true, "error": { "client": {} } }), OutcomeError::UnexpectedPayload)]
    #[case(json!({ "success": false, "error": null }), OutcomeError::MissingPayload)]
    #[case(
        json!({ "success": false, "data": 7, "error": { "client": {} } }),
        OutcomeError::UnexpectedData
    )]
    #[case(json!({ "success": false, "error": {} }), OutcomeError::UnknownPayload(String::new()))]
    #[case(
        json!({ "success": false, "error": { "client": {}, "raw": {} } }),
        OutcomeError::UnknownPayload("client, raw".to_string())
    )]
    fn test_shape_violations(#[case] value: Value, #[case] expected: OutcomeError) {
        assert_eq!(OutcomeShape::of(&value).unwrap_err(), expected);
    }
}
