//! Unit declaration and execution.
//!
//! A unit is declared with [`UnitBuilder`] and invoked through
//! [`UnitDefinition::call`]. One invocation:
//!
//! 1. validates inputs (nothing runs on a violation)
//! 2. runs the steps in registration order on one [`ExecutionContext`]
//! 3. hands any fault to the [`RescueChain`] exactly once
//! 4. validates outputs and builds the [`Outcome`](crate::outcome::Outcome)

mod builder;
mod context;
mod definition;
#[cfg(test)]
mod integration_tests;
mod interrupt;
mod invocation;
mod orchestrator;
mod rescue;
mod step;

pub use builder::UnitBuilder;
pub use context::ExecutionContext;
pub use definition::{AttributeInfo, UnitDefinition, UnitInfo};
pub use interrupt::Interrupt;
pub use orchestrator::{ExecutionResult, StepOrchestrator};
pub use rescue::{RescueChain, RescueRule, Resolution};
pub use step::{Condition, Rollback, Stage, Step, StepAction, StepResult, Wrapper};
