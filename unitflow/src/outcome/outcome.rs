//! The outcome of one invocation.

use super::{Failure, Outputs};
use crate::contracts::Violation;
use crate::core::AttributeKind;
use crate::errors::UnitflowError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad category of a failed outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Attribute values broke their contracts.
    Validation,
    /// A step or rescue rule declared a failure.
    Business,
    /// A fault nothing handled.
    Fatal,
}

/// Result of invoking a unit.
#[derive(Debug)]
pub enum Outcome {
    /// Every step ran and the outputs validated.
    Success(Outputs),
    /// Attributes of one kind broke their contracts.
    ValidationFailure {
        /// Kind of the failing attributes.
        kind: AttributeKind,
        /// Blocking violations.
        violations: Vec<Violation>,
    },
    /// A declared failure.
    BusinessFailure(Failure),
    /// An unhandled fault.
    FatalFault(anyhow::Error),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for any failed outcome.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The failure category, if the outcome failed.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::ValidationFailure { .. } => Some(FailureKind::Validation),
            Self::BusinessFailure(_) => Some(FailureKind::Business),
            Self::FatalFault(_) => Some(FailureKind::Fatal),
        }
    }

    /// The failure type: the attribute kind for validation failures, the
    /// declared status for business failures, `fatal` for faults.
    #[must_use]
    pub fn failure_type(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::ValidationFailure { kind, .. } => Some(kind.as_str()),
            Self::BusinessFailure(failure) => Some(&failure.status),
            Self::FatalFault(_) => Some("fatal"),
        }
    }

    /// Human-readable failure message.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Success(_) => None,
            Self::ValidationFailure { violations, .. } => Some(
                violations
                    .iter()
                    .map(Violation::message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Self::BusinessFailure(failure) => Some(failure.message.clone()),
            Self::FatalFault(fault) => Some(format!("{fault:#}")),
        }
    }

    /// Violations of a validation failure; empty otherwise.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::ValidationFailure { violations, .. } => violations,
            _ => &[],
        }
    }

    /// Outputs of a successful outcome.
    #[must_use]
    pub const fn outputs(&self) -> Option<&Outputs> {
        match self {
            Self::Success(outputs) => Some(outputs),
            _ => None,
        }
    }

    /// The business failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::BusinessFailure(failure) => Some(failure),
            _ => None,
        }
    }

    /// The unhandled fault, if any.
    #[must_use]
    pub const fn fault(&self) -> Option<&anyhow::Error> {
        match self {
            Self::FatalFault(fault) => Some(fault),
            _ => None,
        }
    }

    /// Runs `callback` on success and returns the outcome.
    #[must_use]
    pub fn on_success<F>(self, callback: F) -> Self
    where
        F: FnOnce(&Outputs),
    {
        if let Self::Success(outputs) = &self {
            callback(outputs);
        }
        self
    }

    /// Runs `callback` on failure and returns the outcome.
    ///
    /// With `failure_type` set, the callback only runs when
    /// [`failure_type`](Self::failure_type) equals it.
    #[must_use]
    pub fn on_failure<F>(self, failure_type: Option<&str>, callback: F) -> Self
    where
        F: FnOnce(&Self),
    {
        let matches = match (self.failure_type(), failure_type) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
        };
        if matches {
            callback(&self);
        }
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("success".to_string(), serde_json::Value::Bool(self.is_success()));
        match self {
            Self::Success(outputs) => {
                map.insert(
                    "outputs".to_string(),
                    serde_json::Value::Object(outputs.to_dict().into_iter().collect()),
                );
            }
            Self::ValidationFailure { violations, .. } => {
                map.insert(
                    "violations".to_string(),
                    serde_json::to_value(violations).unwrap_or(serde_json::Value::Null),
                );
            }
            Self::BusinessFailure(failure) => {
                if !failure.meta.is_empty() {
                    map.insert(
                        "meta".to_string(),
                        serde_json::Value::Object(failure.meta.clone().into_iter().collect()),
                    );
                }
            }
            Self::FatalFault(_) => {}
        }
        if let Some(kind) = self.failure_kind() {
            map.insert(
                "failure_kind".to_string(),
                serde_json::to_value(kind).unwrap_or(serde_json::Value::Null),
            );
        }
        if let Some(failure_type) = self.failure_type() {
            map.insert(
                "failure_type".to_string(),
                serde_json::Value::String(failure_type.to_string()),
            );
        }
        if let Some(message) = self.message() {
            map.insert("message".to_string(), serde_json::Value::String(message));
        }
        map
    }

    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the matching [`UnitflowError`] variant for every failed outcome.
    pub fn into_result(self) -> Result<Outputs, UnitflowError> {
        match self {
            Self::Success(outputs) => Ok(outputs),
            Self::ValidationFailure { kind, violations } => {
                Err(UnitflowError::Validation { kind, violations })
            }
            Self::BusinessFailure(failure) => Err(UnitflowError::Business(failure)),
            Self::FatalFault(fault) => Err(UnitflowError::Fatal(fault)),
        }
    }
}
