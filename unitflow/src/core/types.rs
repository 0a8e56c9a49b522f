//! Built-in type identifiers.
//!
//! These names form the nominal type lineage of the built-in [`Value`](super::Value)
//! variants. User types add their own identifiers through
//! [`UnitObject`](super::UnitObject) or the custom `Seq`/`Map` type names.

/// Root of every lineage.
pub const OBJECT: &str = "Object";
/// The type of `nil`.
pub const NIL: &str = "NilClass";
/// `true` / `false`.
pub const BOOLEAN: &str = "Boolean";
/// Common ancestor of integers and floats.
pub const NUMERIC: &str = "Numeric";
/// Signed 64-bit integers.
pub const INTEGER: &str = "Integer";
/// 64-bit floats.
pub const FLOAT: &str = "Float";
/// UTF-8 strings.
pub const STRING: &str = "String";
/// Ordered collections.
pub const ARRAY: &str = "Array";
/// Collections without duplicates.
pub const SET: &str = "Set";
/// Key/value mappings.
pub const HASH: &str = "Hash";
