//! Validation modes, generations and configuration scopes.

use crate::contracts::Violation;
use crate::errors::ConfigurationError;
use crate::registry::{ClassificationMode, ClassificationRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How violations are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Every violation fails the unit.
    #[default]
    Strict,
    /// Only structural violations fail; the rest are logged.
    Permissive,
}

impl ValidationMode {
    /// Splits violations into `(blocking, tolerated)` under this mode.
    #[must_use]
    pub fn split(self, violations: Vec<Violation>) -> (Vec<Violation>, Vec<Violation>) {
        match self {
            Self::Strict => (violations, Vec::new()),
            Self::Permissive => violations
                .into_iter()
                .partition(|violation| violation.reason.is_blocking()),
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::Permissive => f.write_str("permissive"),
        }
    }
}

impl FromStr for ValidationMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            _ => Err(ConfigurationError::InvalidValidationMode(s.to_string())),
        }
    }
}

/// A configuration generation. Generations never see each other's settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// The generation new units are declared in.
    #[default]
    Current,
    /// The generation kept for units that have not migrated yet.
    Legacy,
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => f.write_str("current"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Per-unit settings layered over the generation's root scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeOverrides {
    /// Generation the unit belongs to.
    pub generation: Generation,
    /// Mode override, if any.
    pub validation_mode: Option<ValidationMode>,
    /// Extra classification entries.
    pub registry: ClassificationRegistry,
}

impl ScopeOverrides {
    /// Creates empty overrides in the current generation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the generation.
    #[must_use]
    pub const fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    /// Sets the validation mode.
    #[must_use]
    pub const fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = Some(mode);
        self
    }

    /// Registers an extra classification entry.
    #[must_use]
    pub fn classify(mut self, mode: ClassificationMode, type_name: impl Into<String>) -> Self {
        self.registry.register(mode, type_name);
        self
    }
}

/// A layer of settings with an optional parent of the same generation.
///
/// Lookups check local settings first and then walk up the parent chain.
#[derive(Debug, Clone)]
pub struct ConfigurationScope {
    generation: Generation,
    validation_mode: Option<ValidationMode>,
    registry: ClassificationRegistry,
    parent: Option<Arc<ConfigurationScope>>,
}

impl ConfigurationScope {
    /// A root scope with strict validation and the built-in classifications.
    #[must_use]
    pub fn root(generation: Generation) -> Self {
        Self {
            generation,
            validation_mode: Some(ValidationMode::Strict),
            registry: ClassificationRegistry::with_defaults(),
            parent: None,
        }
    }

    /// A root scope with no settings at all.
    #[must_use]
    pub fn empty(generation: Generation) -> Self {
        Self {
            generation,
            validation_mode: None,
            registry: ClassificationRegistry::new(),
            parent: None,
        }
    }

    /// Creates a child scope applying `overrides` on top of `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::GenerationMismatch`] if the overrides
    /// belong to a different generation than the parent.
    pub fn child_of(parent: Arc<Self>, overrides: &ScopeOverrides) -> Result<Self, ConfigurationError> {
        if parent.generation != overrides.generation {
            return Err(ConfigurationError::GenerationMismatch {
                expected: parent.generation,
                found: overrides.generation,
            });
        }
        Ok(Self {
            generation: overrides.generation,
            validation_mode: overrides.validation_mode,
            registry: overrides.registry.clone(),
            parent: Some(parent),
        })
    }

    /// The generation of this scope.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// The parent scope, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// The effective validation mode.
    #[must_use]
    pub fn validation_mode(&self) -> ValidationMode {
        self.validation_mode
            .or_else(|| self.parent.as_ref().map(|parent| parent.validation_mode()))
            .unwrap_or_default()
    }

    /// Sets the local validation mode.
    pub fn set_validation_mode(&mut self, mode: ValidationMode) {
        self.validation_mode = Some(mode);
    }

    /// Registers a type identifier in the local registry.
    pub fn register(&mut self, mode: ClassificationMode, type_name: impl Into<String>) {
        self.registry.register(mode, type_name);
    }

    /// Registers several type identifiers in the local registry.
    pub fn merge<I, S>(&mut self, mode: ClassificationMode, other: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.merge(mode, other);
    }

    /// Entries set on this scope alone.
    #[must_use]
    pub const fn local_registry(&self) -> &ClassificationRegistry {
        &self.registry
    }

    /// Returns `true` if the identifier is classified under `mode` here or
    /// in any ancestor.
    #[must_use]
    pub fn contains(&self, mode: ClassificationMode, type_name: &str) -> bool {
        self.registry.contains(mode, type_name)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.contains(mode, type_name))
    }

    /// Flattens this scope and its ancestors into one registry.
    #[must_use]
    pub fn resolved_registry(&self) -> ClassificationRegistry {
        let mut resolved = self
            .parent
            .as_ref()
            .map(|parent| parent.resolved_registry())
            .unwrap_or_default();
        resolved.extend(&self.registry);
        resolved
    }
}
