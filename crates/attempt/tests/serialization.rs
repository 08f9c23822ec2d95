//! Integration tests for the outcome wire format
//!
//! The discriminant and the failure payload's key-set must identify the
//! shape of any serialized outcome, whatever the data and messages are.

use attempt::{
    Attempt, Failure, Interchange, NormalizedError, Outcome, OutcomeShape, RawError, ToClient,
    TryOptions,
};
use proptest::prelude::*;
use serde_json::json;

type JsonOutcome = Outcome<serde_json::Value, NormalizedError>;

fn normalized_strategy() -> impl Strategy<Value = NormalizedError> {
    (
        "[A-Z_]{1,12}",
        ".{0,40}",
        proptest::option::of(".{0,40}"),
        proptest::collection::vec(".{0,20}", 0..3),
    )
        .prop_map(|(code, message, user_message, causes)| NormalizedError {
            user_message,
            causes,
            ..NormalizedError::new(code, message)
        })
}

fn raw_strategy() -> impl Strategy<Value = RawError> {
    ("[a-z:&]{1,20}", ".{0,40}").prop_map(|(name, message)| RawError {
        name,
        message,
        causes: Vec::new(),
    })
}

fn outcome_strategy() -> impl Strategy<Value = (JsonOutcome, OutcomeShape)> {
    prop_oneof![
        any::<i64>().prop_map(|n| (Outcome::success(json!(n)), OutcomeShape::Success)),
        (raw_strategy(), normalized_strategy()).prop_map(|(raw, normalized)| (
            Outcome::failure(Failure::internal(raw, normalized)),
            OutcomeShape::InternalFailure
        )),
        normalized_strategy().prop_map(|normalized| (
            Outcome::failure(Failure::client(normalized.to_client())),
            OutcomeShape::ClientFailure
        )),
    ]
}

proptest! {
    #[test]
    fn prop_shape_is_identified_by_keys((outcome, shape) in outcome_strategy()) {
        let value = outcome.to_json_value().unwrap();

        prop_assert_eq!(OutcomeShape::of(&value).unwrap(), shape);
        prop_assert_eq!(value["success"].as_bool(), Some(shape == OutcomeShape::Success));
        if shape == OutcomeShape::Success {
            prop_assert!(value["error"].is_null());
        } else {
            prop_assert!(value["data"].is_null());
        }
    }

    #[test]
    fn prop_outcomes_survive_json(outcome in outcome_strategy().prop_map(|(outcome, _)| outcome)) {
        let json = outcome.to_json_string().unwrap();
        let back = JsonOutcome::from_json_string(&json).unwrap();

        prop_assert_eq!(back, outcome);
    }

    #[test]
    fn prop_client_projection_is_closed(normalized in normalized_strategy()) {
        let value = serde_json::to_value(normalized.to_client()).unwrap();
        let object = value.as_object().unwrap();

        let allowed = ["code", "message", "user_message"];
        prop_assert!(object.keys().all(|key| allowed.contains(&key.as_str())));
    }
}

#[test]
fn test_ok_serializes_data_with_null_error() {
    let attempt = Attempt::default();

    assert_eq!(
        attempt.ok(42).to_json_string().unwrap(),
        r#"{"success":true,"data":42,"error":null}"#
    );
}

#[test]
fn test_internal_failure_wire_format() {
    let attempt = Attempt::default();

    let outcome = attempt.try_sync(|| Err::<u32, _>("socket closed"));
    let mut value = outcome.to_json_value().unwrap();
    value["error"]["normalized"]
        .as_object_mut()
        .unwrap()
        .remove("stack");

    assert_eq!(
        value,
        json!({
            "success": false,
            "data": null,
            "error": {
                "raw": { "name": "&str", "message": "socket closed" },
                "normalized": {
                    "code": "INTERNAL_ERROR",
                    "message": "socket closed",
                    "name": "&str"
                }
            }
        })
    );
}

#[test]
fn test_client_failure_parses_without_rust_types() {
    let attempt = Attempt::default();

    let outcome =
        attempt.try_sync_with(|| Err::<u32, _>("socket closed"), TryOptions::new().client(true));
    let json = outcome.to_json_string().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(OutcomeShape::of(&value).unwrap(), OutcomeShape::ClientFailure);
}

#[test]
fn test_unknown_payload_rejected() {
    let value = json!({ "success": false, "data": null, "error": { "detail": "x" } });

    assert!(OutcomeShape::of(&value).is_err());
    assert!(JsonOutcome::from_json_value(value).is_err());
}

#[test]
fn test_mixed_or_padded_payloads_rejected() {
    let attempt = Attempt::default();
    let internal = attempt.try_sync(|| Err::<u32, _>("socket closed"));
    let mut value = internal.to_json_value().unwrap();
    value["error"]["client"] = json!({ "code": "X", "message": "y" });

    assert!(OutcomeShape::of(&value).is_err());
    assert!(JsonOutcome::from_json_value(value).is_err());

    let padded = json!({
        "success": false,
        "data": 7,
        "error": { "client": { "code": "X", "message": "y" } }
    });
    assert!(OutcomeShape::of(&padded).is_err());
    assert!(JsonOutcome::from_json_value(padded).is_err());
}
