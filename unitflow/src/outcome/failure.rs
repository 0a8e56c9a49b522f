//! Business failures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A declared, expected failure with a status, a message and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct Failure {
    /// Failure type, e.g. `base`, `input` or a domain status like `not_found`.
    pub status: String,
    /// Human-readable message.
    pub message: String,
    /// Additional metadata.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, serde_json::Value>,
}

impl Failure {
    /// Status of failures declared without one.
    pub const BASE: &'static str = "base";
    /// Status of failures blamed on an input.
    pub const INPUT: &'static str = "input";

    /// Creates a failure with the `base` status.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(Self::BASE, message)
    }

    /// Creates a failure with a custom status.
    #[must_use]
    pub fn with_status(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
            meta: HashMap::new(),
        }
    }

    /// Creates a failure blamed on one input.
    #[must_use]
    pub fn input(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(Self::INPUT, message).with_meta("input_name", serde_json::Value::String(name.into()))
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("status".to_string(), serde_json::Value::String(self.status.clone()));
        map.insert("message".to_string(), serde_json::Value::String(self.message.clone()));
        if !self.meta.is_empty() {
            map.insert(
                "meta".to_string(),
                serde_json::Value::Object(self.meta.clone().into_iter().collect()),
            );
        }
        map
    }
}
