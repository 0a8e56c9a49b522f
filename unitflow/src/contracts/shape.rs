//! Declared type shapes.

use crate::core::{types, TypeName};
use serde::Serialize;
use std::fmt;

/// A declared structural type.
///
/// Element, key and value shapes are unions: a non-empty list where any
/// member may match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TypeShape {
    /// Exact or subtype match on a single type.
    Scalar {
        /// Accepted type.
        type_name: TypeName,
    },
    /// A collection-like container whose elements match `element`.
    CollectionOf {
        /// Container type.
        type_name: TypeName,
        /// Accepted element shapes.
        element: Vec<TypeShape>,
    },
    /// A hash-like container with typed keys and values.
    HashOf {
        /// Container type.
        type_name: TypeName,
        /// Accepted key shapes.
        key: Vec<TypeShape>,
        /// Accepted value shapes.
        value: Vec<TypeShape>,
    },
    /// An object matched by type only; members are never inspected.
    ObjectLike {
        /// Accepted type.
        type_name: TypeName,
    },
}

impl TypeShape {
    /// A scalar shape.
    #[must_use]
    pub fn scalar(type_name: impl Into<TypeName>) -> Self {
        Self::Scalar {
            type_name: type_name.into(),
        }
    }

    /// `String`.
    #[must_use]
    pub fn string() -> Self {
        Self::scalar(types::STRING)
    }

    /// `Integer`.
    #[must_use]
    pub fn integer() -> Self {
        Self::scalar(types::INTEGER)
    }

    /// `Float`.
    #[must_use]
    pub fn float() -> Self {
        Self::scalar(types::FLOAT)
    }

    /// `Numeric` (integers and floats).
    #[must_use]
    pub fn numeric() -> Self {
        Self::scalar(types::NUMERIC)
    }

    /// `Boolean`.
    #[must_use]
    pub fn boolean() -> Self {
        Self::scalar(types::BOOLEAN)
    }

    /// `NilClass`, used to accept an explicit `nil`.
    #[must_use]
    pub fn nil() -> Self {
        Self::scalar(types::NIL)
    }

    /// `Hash` without key or value constraints.
    #[must_use]
    pub fn any_hash() -> Self {
        Self::scalar(types::HASH)
    }

    /// A collection of `container` type with one accepted element shape.
    #[must_use]
    pub fn collection_of(container: impl Into<TypeName>, element: Self) -> Self {
        Self::CollectionOf {
            type_name: container.into(),
            element: vec![element],
        }
    }

    /// `Array` whose elements match `element`.
    #[must_use]
    pub fn array_of(element: Self) -> Self {
        Self::collection_of(types::ARRAY, element)
    }

    /// `Hash` whose keys match `key` and values match `value`.
    #[must_use]
    pub fn hash_of(key: Self, value: Self) -> Self {
        Self::HashOf {
            type_name: TypeName::new(types::HASH),
            key: vec![key],
            value: vec![value],
        }
    }

    /// An object-like shape.
    #[must_use]
    pub fn object(type_name: impl Into<TypeName>) -> Self {
        Self::ObjectLike {
            type_name: type_name.into(),
        }
    }

    /// Adds an accepted element shape to a collection shape.
    #[must_use]
    pub fn or_element(mut self, shape: Self) -> Self {
        if let Self::CollectionOf { element, .. } = &mut self {
            if !element.contains(&shape) {
                element.push(shape);
            }
        }
        self
    }

    /// The container or scalar type this shape names.
    #[must_use]
    pub const fn type_name(&self) -> &TypeName {
        match self {
            Self::Scalar { type_name }
            | Self::CollectionOf { type_name, .. }
            | Self::HashOf { type_name, .. }
            | Self::ObjectLike { type_name } => type_name,
        }
    }
}

/// Renders a union of shapes as `A | B`.
#[must_use]
pub fn describe_union(shapes: &[TypeShape]) -> String {
    shapes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar { type_name } => write!(f, "{type_name}"),
            Self::CollectionOf { type_name, element } => {
                write!(f, "{type_name}<{}>", describe_union(element))
            }
            Self::HashOf {
                type_name,
                key,
                value,
            } => write!(
                f,
                "{type_name}<{}, {}>",
                describe_union(key),
                describe_union(value)
            ),
            Self::ObjectLike { type_name } => write!(f, "Object({type_name})"),
        }
    }
}
