//! Runtime value model.
//!
//! Every attribute value a unit sees is a [`Value`]. Each value carries a
//! nominal type lineage that the validator matches declared shapes against.

use super::types;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

pub(crate) static NIL: Value = Value::Nil;

/// Textual identifier of a runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// Creates a new type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A user-defined object carried inside a [`Value`].
///
/// Objects are matched nominally: the validator only ever looks at
/// [`type_name`](Self::type_name) and [`ancestors`](Self::ancestors), never at
/// the object's members.
pub trait UnitObject: fmt::Debug + Send + Sync {
    /// The concrete type name of the object.
    fn type_name(&self) -> &str;

    /// Supertypes of the object, nearest first. `Object` is implied.
    fn ancestors(&self) -> Vec<TypeName> {
        Vec::new()
    }

    /// Access to the concrete type for downcasting inside steps.
    fn as_any(&self) -> &dyn Any;
}

/// A runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value.
    #[default]
    Nil,
    /// A boolean.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
    /// A float.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered collection with a nominal type (`Array`, `Set`, ...).
    Seq {
        /// Runtime type of the collection.
        type_name: TypeName,
        /// Elements in order.
        items: Vec<Value>,
    },
    /// Ordered key/value pairs with a nominal type (`Hash`, ...).
    Map {
        /// Runtime type of the mapping.
        type_name: TypeName,
        /// Entries in insertion order.
        entries: Vec<(Value, Value)>,
    },
    /// A user-defined object.
    Object(Arc<dyn UnitObject>),
}

impl Value {
    /// Builds an `Array`.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        Self::seq(types::ARRAY, items)
    }

    /// Builds a collection with a custom type name.
    #[must_use]
    pub fn seq(type_name: impl Into<TypeName>, items: impl IntoIterator<Item = impl Into<Self>>) -> Self {
        Self::Seq {
            type_name: type_name.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a `Hash` from key/value pairs.
    #[must_use]
    pub fn hash<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Self>,
        V: Into<Self>,
    {
        Self::map(types::HASH, entries)
    }

    /// Builds a mapping with a custom type name.
    #[must_use]
    pub fn map<K, V>(type_name: impl Into<TypeName>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Self>,
        V: Into<Self>,
    {
        Self::Map {
            type_name: type_name.into(),
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Wraps a user object.
    #[must_use]
    pub fn object(object: impl UnitObject + 'static) -> Self {
        Self::Object(Arc::new(object))
    }

    /// The concrete runtime type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Nil => types::NIL,
            Self::Boolean(_) => types::BOOLEAN,
            Self::Integer(_) => types::INTEGER,
            Self::Float(_) => types::FLOAT,
            Self::String(_) => types::STRING,
            Self::Seq { type_name, .. } | Self::Map { type_name, .. } => type_name.as_str(),
            Self::Object(object) => object.type_name(),
        }
    }

    /// The type lineage, most specific first, always ending in `Object`.
    #[must_use]
    pub fn lineage(&self) -> Vec<TypeName> {
        let mut lineage = vec![TypeName::new(self.type_name())];
        match self {
            Self::Integer(_) | Self::Float(_) => lineage.push(TypeName::new(types::NUMERIC)),
            Self::Object(object) => lineage.extend(object.ancestors()),
            _ => {}
        }
        if lineage.iter().all(|name| name.as_str() != types::OBJECT) {
            lineage.push(TypeName::new(types::OBJECT));
        }
        lineage
    }

    /// Returns `true` when `type_name` is the value's type or one of its ancestors.
    #[must_use]
    pub fn is_a(&self, type_name: &str) -> bool {
        self.type_name() == type_name || self.lineage().iter().any(|name| name.as_str() == type_name)
    }

    /// Returns `true` for [`Value::Nil`].
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// `nil`, blank strings, and empty collections are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Boolean(value) => !value,
            Self::String(text) => text.trim().is_empty(),
            Self::Seq { items, .. } => items.is_empty(),
            Self::Map { entries, .. } => entries.is_empty(),
            Self::Integer(_) | Self::Float(_) | Self::Object(_) => false,
        }
    }

    /// Truthiness used by `query_*` helpers.
    ///
    /// `nil`, `false`, `0`, `"0"`, `"f"`, `"false"`, `"off"` (any case) and
    /// blank values are falsy.
    #[must_use]
    pub fn query(&self) -> bool {
        match self {
            Self::Integer(0) => false,
            Self::Float(number) => *number != 0.0,
            Self::String(text) => {
                let text = text.trim();
                !(text.is_empty()
                    || text == "0"
                    || text.eq_ignore_ascii_case("f")
                    || text.eq_ignore_ascii_case("false")
                    || text.eq_ignore_ascii_case("off"))
            }
            other => !other.is_blank(),
        }
    }

    /// Returns the string contents.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer contents.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the numeric contents as a float (integers are widened).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(number) => Some(*number as f64),
            Self::Float(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns the boolean contents.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the elements of a collection.
    #[must_use]
    pub fn items(&self) -> Option<&[Self]> {
        match self {
            Self::Seq { items, .. } => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a mapping.
    #[must_use]
    pub fn entries(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Map { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Looks up a string key in a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.entries()?
            .iter()
            .find(|(candidate, _)| candidate.as_str() == Some(key))
            .map(|(_, value)| value)
    }

    /// Mutable lookup of a string key in a mapping.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self {
            Self::Map { entries, .. } => entries
                .iter_mut()
                .find(|(candidate, _)| candidate.as_str() == Some(key))
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// Inserts or replaces an entry. Returns `false` when `self` is not a mapping.
    pub fn insert(&mut self, key: impl Into<Self>, value: impl Into<Self>) -> bool {
        let Self::Map { entries, .. } = self else {
            return false;
        };
        let key = key.into();
        let value = value.into();
        match entries.iter_mut().find(|(candidate, _)| *candidate == key) {
            Some(entry) => entry.1 = value,
            None => entries.push((key, value)),
        }
        true
    }

    /// Size of strings (in characters), collections and mappings.
    #[must_use]
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::String(text) => Some(text.chars().count()),
            Self::Seq { items, .. } => Some(items.len()),
            Self::Map { entries, .. } => Some(entries.len()),
            _ => None,
        }
    }

    /// Returns `true` when [`len`](Self::len) is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Downcasts a wrapped object to its concrete type.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Self::Object(object) => object.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Converts the value to JSON. Objects render as `#<TypeName>`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (
                Self::Seq { type_name: ta, items: a },
                Self::Seq { type_name: tb, items: b },
            ) => ta == tb && a == b,
            (
                Self::Map { type_name: ta, entries: a },
                Self::Map { type_name: tb, entries: b },
            ) => ta == tb && a == b,
            (Self::Object(a), Self::Object(b)) => {
                std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(number) => write!(f, "{number}"),
            Self::Float(number) => write!(f, "{number}"),
            Self::String(text) => write!(f, "{text:?}"),
            Self::Seq { items, .. } => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map { entries, .. } => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                f.write_str("}")
            }
            Self::Object(object) => write!(f, "#<{}>", object.type_name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Boolean(value) => serializer.serialize_bool(*value),
            Self::Integer(number) => serializer.serialize_i64(*number),
            Self::Float(number) => serializer.serialize_f64(*number),
            Self::String(text) => serializer.serialize_str(text),
            Self::Seq { items, .. } => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map { entries, .. } => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    match key {
                        Self::String(text) => map.serialize_entry(text, value)?,
                        other => map.serialize_entry(&other.to_string(), value)?,
                    }
                }
                map.end()
            }
            Self::Object(object) => serializer.serialize_str(&format!("#<{}>", object.type_name())),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(value) => Self::Boolean(value),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map_or_else(|| Self::Float(number.as_f64().unwrap_or(f64::NAN)), Self::Integer),
            serde_json::Value::String(text) => Self::String(text),
            serde_json::Value::Array(items) => Self::array(items),
            serde_json::Value::Object(entries) => Self::hash(entries),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}
