//! Error types for the unitflow engine.
//!
//! Contract violations are data ([`Violation`]) and never travel through this
//! module. The types here cover misdeclared units, invalid configuration, and
//! the conversion of an [`Outcome`](crate::outcome::Outcome) into a `Result`.

use crate::config::Generation;
use crate::contracts::Violation;
use crate::core::AttributeKind;
use crate::outcome::Failure;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Stable codes attached to [`DefinitionError`]s.
pub mod codes {
    /// The unit has no name.
    pub const EMPTY_NAME: &str = "UNIT-001-EMPTY_NAME";
    /// Two attributes of the same kind share a name.
    pub const DUPLICATE_ATTRIBUTE: &str = "UNIT-002-DUPLICATE_ATTRIBUTE";
    /// An alias repeats another alias or an input name.
    pub const DUPLICATE_ALIAS: &str = "UNIT-003-DUPLICATE_ALIAS";
    /// An option is set on an attribute kind that does not support it.
    pub const MISPLACED_OPTION: &str = "UNIT-004-MISPLACED_OPTION";
    /// An attribute accepts no shapes.
    pub const EMPTY_SHAPES: &str = "UNIT-005-EMPTY_SHAPES";
    /// A container or object shape names a type the registry does not classify.
    pub const UNRESOLVED_SHAPE: &str = "UNIT-006-UNRESOLVED_SHAPE";
    /// A schema is attached to an attribute that accepts no hash.
    pub const SCHEMA_WITHOUT_HASH: &str = "UNIT-007-SCHEMA_WITHOUT_HASH";
}

/// The main error type for unitflow operations.
#[derive(Debug, Error)]
pub enum UnitflowError {
    /// A unit was declared incorrectly.
    #[error("{0}")]
    Definition(#[from] DefinitionError),

    /// Configuration could not be resolved.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// Attribute values broke their contracts.
    #[error("Validation failed for {kind} attributes: {}", render_violations(violations))]
    Validation {
        /// Kind of the failing attributes.
        kind: AttributeKind,
        /// Every blocking violation.
        violations: Vec<Violation>,
    },

    /// A step declared a business failure.
    #[error("{0}")]
    Business(#[from] Failure),

    /// A fault no rescue rule handled.
    #[error("Unhandled fault: {0:#}")]
    Fatal(anyhow::Error),
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Metadata about a contract error for better diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ContractErrorInfo {
    /// Error code (e.g., "UNIT-002-DUPLICATE_ATTRIBUTE").
    pub code: String,
    /// Short summary of the error.
    pub summary: String,
    /// Hint for fixing the error.
    pub fix_hint: Option<String>,
    /// Additional context key-value pairs.
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl ContractErrorInfo {
    /// Creates a new contract error info with the standard hint for `code`.
    #[must_use]
    pub fn new(code: impl Into<String>, summary: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            fix_hint: fix_hint(&code).map(ToString::to_string),
            code,
            summary: summary.into(),
            context: HashMap::new(),
        }
    }

    /// Sets the fix hint.
    #[must_use]
    pub fn with_fix_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Adds a single context entry.
    #[must_use]
    pub fn with_context_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::Value::String(self.code.clone()));
        map.insert("summary".to_string(), serde_json::Value::String(self.summary.clone()));
        if let Some(ref hint) = self.fix_hint {
            map.insert("fix_hint".to_string(), serde_json::Value::String(hint.clone()));
        }
        if !self.context.is_empty() {
            let context_map: serde_json::Map<String, serde_json::Value> = self
                .context
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect();
            map.insert("context".to_string(), serde_json::Value::Object(context_map));
        }
        map
    }
}

/// Standard remediation hint for a definition error code.
#[must_use]
pub fn fix_hint(code: &str) -> Option<&'static str> {
    let hint = match code {
        codes::EMPTY_NAME => "Give the unit a non-empty name.",
        codes::DUPLICATE_ATTRIBUTE => "Rename one of the attributes; names must be unique per kind.",
        codes::DUPLICATE_ALIAS => "Pick an alias that no other input uses as its name or alias.",
        codes::MISPLACED_OPTION => {
            "Aliases and prepare only apply to inputs; defaults only to optional inputs."
        }
        codes::EMPTY_SHAPES => "Declare at least one accepted shape.",
        codes::UNRESOLVED_SHAPE => {
            "Register the type in the generation's classification registry, or use a scalar shape."
        }
        codes::SCHEMA_WITHOUT_HASH => "Accept a hash-like shape on attributes that carry a schema.",
        _ => return None,
    };
    Some(hint)
}

/// Error raised when a unit declaration breaks a declaration rule.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid unit '{unit}': {message}")]
pub struct DefinitionError {
    /// Name of the unit.
    pub unit: String,
    /// The error message.
    pub message: String,
    /// The attributes involved in the error.
    pub attributes: Vec<String>,
    /// Contract error info.
    pub error_info: ContractErrorInfo,
}

impl DefinitionError {
    /// Creates a new definition error.
    #[must_use]
    pub fn new(unit: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            unit: unit.into(),
            error_info: ContractErrorInfo::new(code, message.clone()),
            message,
            attributes: Vec::new(),
        }
    }

    /// Sets the attributes involved.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// The error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.error_info.code
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("unit".to_string(), serde_json::Value::String(self.unit.clone()));
        map.insert("message".to_string(), serde_json::Value::String(self.message.clone()));
        map.insert(
            "attributes".to_string(),
            serde_json::Value::Array(
                self.attributes
                    .iter()
                    .map(|s| serde_json::Value::String(s.clone()))
                    .collect(),
            ),
        );
        let info_map: serde_json::Map<String, serde_json::Value> =
            self.error_info.to_dict().into_iter().collect();
        map.insert("error_info".to_string(), serde_json::Value::Object(info_map));
        map
    }
}

/// Error raised when configuration cannot be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A scope was attached to a parent of another generation.
    #[error("Configuration generation mismatch: expected {expected}, found {found}")]
    GenerationMismatch {
        /// Generation of the parent scope.
        expected: Generation,
        /// Generation of the child scope.
        found: Generation,
    },

    /// A validation mode string was not recognised.
    #[error("Invalid validation mode '{0}' (expected 'strict' or 'permissive')")]
    InvalidValidationMode(String),
}
