//! # Unitflow
//!
//! A contract-and-execution engine for service units.
//!
//! A unit is a discrete piece of business logic with declared attributes:
//!
//! - **Typed contracts**: inputs, internals and outputs accept unions of
//!   scalar, collection-of, hash-of and object-like shapes
//! - **Validation as data**: violations are collected and returned, never thrown
//! - **Ordered steps**: steps run in registration order and stop at the first failure
//! - **Rescue rules**: faults are converted into outcomes, first match wins
//! - **Configuration generations**: current and legacy settings never mix
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use unitflow::prelude::*;
//!
//! let unit = UnitBuilder::new("CopyId")
//!     .attribute(AttributeContract::input("id", TypeShape::string()))
//!     .attribute(AttributeContract::output("id", TypeShape::string()))
//!     .step("copy", |ctx| {
//!         let id = ctx.input("id")?.clone();
//!         ctx.set_output("id", id)?;
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let outcome = unit.call([("id", "abc")]);
//! assert!(outcome.is_success());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod contracts;
pub mod core;
pub mod errors;
pub mod observability;
pub mod outcome;
pub mod registry;
pub mod testing;
pub mod unit;
pub mod validation;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{
        Configuration, ConfigurationScope, Generation, ScopeOverrides, ValidationMode,
    };
    pub use crate::contracts::{
        AttributeCheck, AttributeContract, Format, MustCheck, Schema, SchemaField, TypeShape,
        Violation, ViolationReason,
    };
    pub use crate::core::{AttributeKind, TypeName, UnitObject, Value};
    pub use crate::errors::{ConfigurationError, ContractErrorInfo, DefinitionError, UnitflowError};
    pub use crate::observability::{init_tracing, SpanTimer, UnitSpanAttributes};
    pub use crate::outcome::{Failure, FailureKind, Outcome, Outputs};
    pub use crate::registry::{ClassificationMode, ClassificationRegistry};
    pub use crate::unit::{
        ExecutionContext, Interrupt, RescueChain, RescueRule, Resolution, Stage, Step, StepResult,
        UnitBuilder, UnitDefinition,
    };
    pub use crate::validation::{ValidationReport, Validator};
}
