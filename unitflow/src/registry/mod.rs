//! Classification registries.
//!
//! A registry maps each [`ClassificationMode`] to the set of type identifiers
//! treated as collection-like, hash-like or object-like during validation.

mod classification;

pub use classification::{ClassificationMode, ClassificationRegistry};
