//! Attribute kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role an attribute plays in a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Supplied by the caller, validated before the first step.
    Input,
    /// Produced by the steps, validated after the last step.
    Output,
    /// Working state, validated whenever it is written.
    Internal,
}

impl AttributeKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
