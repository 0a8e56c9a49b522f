//! Contract violations.

use crate::core::AttributeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a value broke its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationReason {
    /// A required attribute was absent.
    MissingRequired,
    /// No accepted shape matched the value's type.
    WrongType,
    /// A collection element did not match the element union.
    WrongElementType,
    /// A hash key did not match the key union.
    WrongKeyType,
    /// A hash value did not match the value union.
    WrongValueType,
    /// The value is not one of the allowed values.
    NotIncluded,
    /// A dynamic check (`min`, `format`, `must`, ...) failed.
    CheckFailed,
    /// A hash did not conform to its schema.
    SchemaMismatch,
    /// The caller supplied an input the unit does not declare.
    UnexpectedInput,
    /// A step accessed an attribute the unit does not declare.
    UndefinedAttribute,
}

impl ViolationReason {
    /// Returns the snake_case name of the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::WrongType => "wrong_type",
            Self::WrongElementType => "wrong_element_type",
            Self::WrongKeyType => "wrong_key_type",
            Self::WrongValueType => "wrong_value_type",
            Self::NotIncluded => "not_included",
            Self::CheckFailed => "check_failed",
            Self::SchemaMismatch => "schema_mismatch",
            Self::UnexpectedInput => "unexpected_input",
            Self::UndefinedAttribute => "undefined_attribute",
        }
    }

    /// Structural problems that fail a unit even in permissive mode.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::MissingRequired | Self::UnexpectedInput | Self::UndefinedAttribute
        )
    }
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broken contract rule. Violations are collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Exposed name of the attribute.
    pub attribute_name: String,
    /// Kind of the attribute.
    pub kind: AttributeKind,
    /// What went wrong.
    pub reason: ViolationReason,
    /// Human-readable detail (indices, keys, expected types).
    pub detail: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        attribute_name: impl Into<String>,
        kind: AttributeKind,
        reason: ViolationReason,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            kind,
            reason,
            detail: detail.into(),
        }
    }

    /// Renders the violation as one sentence.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "[{}] `{}` {}: {}",
            self.kind, self.attribute_name, self.reason, self.detail
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
