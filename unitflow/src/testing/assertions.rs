//! Test assertions for outcomes.

use crate::contracts::ViolationReason;
use crate::core::{AttributeKind, Value};
use crate::outcome::Outcome;

/// Asserts that the outcome is a success.
pub fn assert_success(outcome: &Outcome) {
    assert!(
        outcome.is_success(),
        "Expected success, got {:?}: {:?}",
        outcome.failure_type(),
        outcome.message()
    );
}

/// Asserts that the outcome failed in any way.
pub fn assert_failure(outcome: &Outcome) {
    assert!(
        outcome.is_failure(),
        "Expected failure, got success with outputs {:?}",
        outcome.outputs()
    );
}

/// Asserts a validation failure on attributes of `kind`.
pub fn assert_validation_failure(outcome: &Outcome, kind: AttributeKind) {
    match outcome {
        Outcome::ValidationFailure { kind: actual, .. } => assert_eq!(
            *actual, kind,
            "Expected {kind} validation failure, got {actual} validation failure"
        ),
        other => panic!(
            "Expected {kind} validation failure, got {:?}: {:?}",
            other.failure_type(),
            other.message()
        ),
    }
}

/// Asserts that some violation names `attribute` with `reason`.
pub fn assert_violation(outcome: &Outcome, attribute: &str, reason: ViolationReason) {
    let violations = outcome.violations();
    assert!(
        violations
            .iter()
            .any(|violation| violation.attribute_name == attribute && violation.reason == reason),
        "Expected violation {reason} on '{attribute}', got: {:?}",
        violations.iter().map(|v| v.message()).collect::<Vec<_>>()
    );
}

/// Asserts a business failure with the given status.
pub fn assert_business_failure(outcome: &Outcome, status: &str) {
    match outcome.failure() {
        Some(failure) => assert_eq!(
            failure.status, status,
            "Expected business failure '{status}', got '{}': {}",
            failure.status, failure.message
        ),
        None => panic!(
            "Expected business failure '{status}', got {:?}",
            outcome.failure_type()
        ),
    }
}

/// Asserts an unhandled fault.
pub fn assert_fatal(outcome: &Outcome) {
    assert!(
        outcome.fault().is_some(),
        "Expected fatal fault, got {:?}: {:?}",
        outcome.failure_type(),
        outcome.message()
    );
}

/// Asserts that a successful outcome carries `expected` under `name`.
pub fn assert_output_value(outcome: &Outcome, name: &str, expected: &Value) {
    assert_success(outcome);
    let actual = outcome.outputs().and_then(|outputs| outputs.get(name));
    assert_eq!(
        actual,
        Some(expected),
        "Expected value {expected} for output '{name}', got {actual:?}"
    );
}
