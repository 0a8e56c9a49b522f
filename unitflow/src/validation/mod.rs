//! Contract validation.
//!
//! The [`Validator`] checks one value against one [`AttributeContract`] and
//! returns every violation it finds. It never fails and never panics; callers
//! decide what a violation means through [`enforce`].
//!
//! [`AttributeContract`]: crate::contracts::AttributeContract

mod schema;
mod validator;

pub use validator::{ValidationReport, Validator};

use crate::config::ValidationMode;
use crate::contracts::Violation;

/// Applies a validation mode to a set of violations.
///
/// Tolerated violations are logged at warn level. Returns the blocking
/// violations as an error when there are any.
///
/// # Errors
///
/// Returns the violations that fail the unit under `mode`.
pub fn enforce(mode: ValidationMode, violations: Vec<Violation>) -> Result<(), Vec<Violation>> {
    let (blocking, tolerated) = mode.split(violations);
    for violation in &tolerated {
        tracing::warn!(
            attribute = %violation.attribute_name,
            kind = %violation.kind,
            reason = %violation.reason,
            detail = %violation.detail,
            "Tolerated contract violation"
        );
    }
    if blocking.is_empty() {
        Ok(())
    } else {
        Err(blocking)
    }
}
