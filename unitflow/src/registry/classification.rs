//! Per-mode sets of type identifiers.

use crate::core::{types, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How a type identifier is classified for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Values iterated element-wise.
    CollectionLike,
    /// Values iterated as key/value pairs.
    HashLike,
    /// Opaque objects matched by type only.
    ObjectLike,
}

impl fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CollectionLike => "collection_like",
            Self::HashLike => "hash_like",
            Self::ObjectLike => "object_like",
        };
        f.write_str(name)
    }
}

/// Mapping of classification mode to the type identifiers in that mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationRegistry {
    collection_like: HashSet<String>,
    hash_like: HashSet<String>,
    object_like: HashSet<String>,
}

impl ClassificationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in classifications:
    /// `Array` and `Set` are collection-like, `Hash` is hash-like.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ClassificationMode::CollectionLike, types::ARRAY);
        registry.register(ClassificationMode::CollectionLike, types::SET);
        registry.register(ClassificationMode::HashLike, types::HASH);
        registry
    }

    const fn set(&self, mode: ClassificationMode) -> &HashSet<String> {
        match mode {
            ClassificationMode::CollectionLike => &self.collection_like,
            ClassificationMode::HashLike => &self.hash_like,
            ClassificationMode::ObjectLike => &self.object_like,
        }
    }

    fn set_mut(&mut self, mode: ClassificationMode) -> &mut HashSet<String> {
        match mode {
            ClassificationMode::CollectionLike => &mut self.collection_like,
            ClassificationMode::HashLike => &mut self.hash_like,
            ClassificationMode::ObjectLike => &mut self.object_like,
        }
    }

    /// Adds a type identifier to a mode.
    pub fn register(&mut self, mode: ClassificationMode, type_name: impl Into<String>) {
        self.set_mut(mode).insert(type_name.into());
    }

    /// Adds every identifier of `other` to a mode.
    pub fn merge<I, S>(&mut self, mode: ClassificationMode, other: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_mut(mode).extend(other.into_iter().map(Into::into));
    }

    /// Returns `true` if the identifier is registered under `mode`.
    #[must_use]
    pub fn contains(&self, mode: ClassificationMode, type_name: &str) -> bool {
        self.set(mode).contains(type_name)
    }

    /// Identifiers of `other` that are registered under `mode`.
    #[must_use]
    pub fn intersect<'a, I>(&self, mode: ClassificationMode, other: I) -> HashSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set = self.set(mode);
        other
            .into_iter()
            .filter(|name| set.contains(*name))
            .map(ToString::to_string)
            .collect()
    }

    /// Returns `true` if any identifier of `other` is registered under `mode`.
    #[must_use]
    pub fn intersects<'a, I>(&self, mode: ClassificationMode, other: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set = self.set(mode);
        other.into_iter().any(|name| set.contains(name))
    }

    /// All identifiers registered under `mode`, sorted.
    #[must_use]
    pub fn members(&self, mode: ClassificationMode) -> Vec<&str> {
        let mut members: Vec<&str> = self.set(mode).iter().map(String::as_str).collect();
        members.sort_unstable();
        members
    }

    /// Returns a new registry holding the entries of both registries.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(other);
        merged
    }

    /// Adds every entry of `other`, in all modes.
    pub fn extend(&mut self, other: &Self) {
        for mode in [
            ClassificationMode::CollectionLike,
            ClassificationMode::HashLike,
            ClassificationMode::ObjectLike,
        ] {
            self.merge(mode, other.set(mode).iter().cloned());
        }
    }

    /// Returns `true` if any type in the value's lineage is registered under `mode`.
    #[must_use]
    pub fn classifies(&self, mode: ClassificationMode, value: &Value) -> bool {
        let lineage = value.lineage();
        self.intersects(mode, lineage.iter().map(|name| name.as_str()))
    }

    /// Returns `true` if no mode has any entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection_like.is_empty() && self.hash_like.is_empty() && self.object_like.is_empty()
    }
}
