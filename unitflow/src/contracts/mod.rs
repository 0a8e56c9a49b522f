//! Attribute contracts.
//!
//! A contract declares what a unit accepts, uses internally, and produces:
//! - [`TypeShape`] unions describing accepted runtime types
//! - [`AttributeContract`] with inclusion lists, defaults and dynamic checks
//! - [`AttributeCheck`] dynamic options (`min`, `max`, `format`, ...)
//! - [`Schema`] for hashes with a fixed set of keys
//! - [`Violation`] records produced when a value breaks a contract

mod attribute;
mod checks;
mod schema;
mod shape;
mod violation;

pub use attribute::{AttributeContract, Prepare};
pub use checks::{AttributeCheck, Format, MustCheck};
pub use schema::{Schema, SchemaField};
pub use shape::{describe_union, TypeShape};
pub use violation::{Violation, ViolationReason};
