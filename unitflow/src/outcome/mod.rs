//! Structured results of a unit invocation.
//!
//! Every call produces exactly one [`Outcome`]: success with validated
//! [`Outputs`], a validation failure, a business [`Failure`] declared by a
//! step or a rescue rule, or a fatal fault nothing handled.

mod failure;
#[allow(clippy::module_inception)]
mod outcome;
mod outputs;

pub use failure::Failure;
pub use outcome::{FailureKind, Outcome};
pub use outputs::Outputs;
