//! Control signals returned by steps.

use crate::contracts::Violation;
use crate::core::AttributeKind;
use crate::outcome::Failure;
use thiserror::Error;

/// A non-exceptional way for a step to end the run early.
///
/// Steps return interrupts through `?`; the orchestrator recognises them
/// before the rescue chain sees anything, so they are never rescued.
#[derive(Debug, Error)]
pub enum Interrupt {
    /// A declared business failure.
    #[error("{0}")]
    Failure(Failure),

    /// A contract was broken while the steps were running.
    #[error("{} violation(s) on {kind} attributes", violations.len())]
    Invalid {
        /// Kind of the broken attributes.
        kind: AttributeKind,
        /// The violations.
        violations: Vec<Violation>,
    },

    /// Finish successfully without running the remaining steps.
    #[error("Unit finished early")]
    Success,
}

impl From<Failure> for Interrupt {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}
