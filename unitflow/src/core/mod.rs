//! Core runtime types for unitflow.
//!
//! This module contains the fundamental types every other layer builds on:
//! - Attribute kinds (input, internal, output)
//! - The runtime value model with nominal type lineage
//! - Built-in type identifiers

mod kind;
pub mod types;
mod value;
#[cfg(test)]
mod value_tests;

pub use kind::AttributeKind;
pub use value::{TypeName, UnitObject, Value};

pub(crate) use value::NIL;
