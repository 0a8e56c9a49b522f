//! Immutable unit definitions.

use super::{RescueChain, Stage};
use crate::config::{Configuration, ConfigurationScope, Generation, ScopeOverrides};
use crate::contracts::{AttributeContract, TypeShape};
use crate::core::{AttributeKind, Value};
use crate::errors::{codes, DefinitionError};
use crate::registry::ClassificationMode;
use serde::Serialize;
use std::collections::HashSet;

/// A validated unit declaration.
///
/// Definitions are immutable and can be shared across threads behind an
/// `Arc`; every call gets its own [`ExecutionContext`](super::ExecutionContext).
#[derive(Debug, Clone)]
pub struct UnitDefinition {
    pub(super) name: String,
    pub(super) inputs: Vec<AttributeContract>,
    pub(super) internals: Vec<AttributeContract>,
    pub(super) outputs: Vec<AttributeContract>,
    pub(super) stages: Vec<Stage>,
    pub(super) rescue: RescueChain,
    pub(super) overrides: ScopeOverrides,
}

impl UnitDefinition {
    /// Unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared inputs.
    #[must_use]
    pub fn inputs(&self) -> &[AttributeContract] {
        &self.inputs
    }

    /// Declared internal attributes.
    #[must_use]
    pub fn internals(&self) -> &[AttributeContract] {
        &self.internals
    }

    /// Declared outputs.
    #[must_use]
    pub fn outputs(&self) -> &[AttributeContract] {
        &self.outputs
    }

    /// Stages in registration order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Total number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.steps.len()).sum()
    }

    /// The unit's rescue rules.
    #[must_use]
    pub const fn rescue_chain(&self) -> &RescueChain {
        &self.rescue
    }

    /// Per-unit configuration overrides.
    #[must_use]
    pub const fn overrides(&self) -> &ScopeOverrides {
        &self.overrides
    }

    /// Generation the unit resolves its configuration in.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.overrides.generation
    }

    /// Input by declaration name.
    #[must_use]
    pub fn input_contract(&self, name: &str) -> Option<&AttributeContract> {
        self.inputs.iter().find(|contract| contract.name == name)
    }

    /// Internal attribute by name.
    #[must_use]
    pub fn internal_contract(&self, name: &str) -> Option<&AttributeContract> {
        self.internals.iter().find(|contract| contract.name == name)
    }

    /// Output by name.
    #[must_use]
    pub fn output_contract(&self, name: &str) -> Option<&AttributeContract> {
        self.outputs.iter().find(|contract| contract.name == name)
    }

    /// Moves the unit to another generation.
    ///
    /// Shape resolution is checked again against the target generation's
    /// registry, since classifications never carry over between generations.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if a shape does not resolve in the target
    /// generation.
    pub fn migrate_to(&self, generation: Generation, configuration: &Configuration) -> Result<Self, DefinitionError> {
        let mut migrated = self.clone();
        migrated.overrides.generation = generation;
        migrated.check(configuration)?;
        tracing::info!(
            unit = %self.name,
            from = %self.overrides.generation,
            to = %generation,
            "Unit migrated"
        );
        Ok(migrated)
    }

    /// Serializable description of the unit's declaration.
    #[must_use]
    pub fn info(&self) -> UnitInfo {
        UnitInfo {
            name: self.name.clone(),
            generation: self.overrides.generation,
            inputs: self.inputs.iter().map(AttributeInfo::from).collect(),
            internals: self.internals.iter().map(AttributeInfo::from).collect(),
            outputs: self.outputs.iter().map(AttributeInfo::from).collect(),
            steps: self
                .stages
                .iter()
                .flat_map(|stage| stage.steps.iter().map(|step| step.name.clone()))
                .collect(),
        }
    }

    /// Checks every declaration rule against the configuration scope the
    /// unit resolves in.
    pub(super) fn check(&self, configuration: &Configuration) -> Result<(), DefinitionError> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::new(&self.name, codes::EMPTY_NAME, "unit name is empty"));
        }

        let scope = ConfigurationScope::child_of(configuration.scope(self.generation()), &self.overrides)
            .map_err(|err| {
                DefinitionError::new(&self.name, codes::UNRESOLVED_SHAPE, err.to_string())
            })?;

        for contracts in [&self.inputs, &self.internals, &self.outputs] {
            let mut seen = HashSet::new();
            for contract in contracts {
                if !seen.insert(contract.name.as_str()) {
                    return Err(self.error(
                        codes::DUPLICATE_ATTRIBUTE,
                        contract,
                        format!("{} `{}` is declared twice", contract.kind, contract.name),
                    ));
                }
                self.check_contract(contract, &scope)?;
            }
        }

        let names: HashSet<&str> = self.inputs.iter().map(|contract| contract.name.as_str()).collect();
        let mut aliases = HashSet::new();
        for contract in &self.inputs {
            let Some(alias) = contract.alias.as_deref() else {
                continue;
            };
            if !aliases.insert(alias) || (alias != contract.name && names.contains(alias)) {
                return Err(self.error(
                    codes::DUPLICATE_ALIAS,
                    contract,
                    format!("alias `{alias}` of input `{}` is already taken", contract.name),
                ));
            }
        }
        Ok(())
    }

    fn check_contract(&self, contract: &AttributeContract, scope: &ConfigurationScope) -> Result<(), DefinitionError> {
        let is_input = contract.kind == AttributeKind::Input;

        if contract.accepted_shapes.is_empty() {
            return Err(self.error(
                codes::EMPTY_SHAPES,
                contract,
                format!("{} `{}` accepts no shapes", contract.kind, contract.name),
            ));
        }
        if contract.alias.is_some() && !is_input {
            return Err(self.misplaced(contract, "alias"));
        }
        if contract.prepare.is_some() && !is_input {
            return Err(self.misplaced(contract, "prepare"));
        }
        if contract.default.is_some() && !(is_input && !contract.required) {
            return Err(self.misplaced(contract, "default"));
        }

        for shape in &contract.accepted_shapes {
            if let Some((mode, type_name)) = unresolved(shape, scope) {
                return Err(self.error(
                    codes::UNRESOLVED_SHAPE,
                    contract,
                    format!(
                        "{} `{}` uses `{type_name}`, which is not {mode} in the {} generation",
                        contract.kind, contract.name, scope.generation()
                    ),
                ));
            }
        }

        if contract.schema.is_some()
            && !contract
                .accepted_shapes
                .iter()
                .any(|shape| scope.contains(ClassificationMode::HashLike, shape.type_name().as_str()))
        {
            return Err(self.error(
                codes::SCHEMA_WITHOUT_HASH,
                contract,
                format!("{} `{}` has a schema but accepts no hash", contract.kind, contract.name),
            ));
        }
        Ok(())
    }

    fn misplaced(&self, contract: &AttributeContract, option: &str) -> DefinitionError {
        let allowed = if option == "default" {
            "optional inputs"
        } else {
            "inputs"
        };
        self.error(
            codes::MISPLACED_OPTION,
            contract,
            format!(
                "{} `{}` sets `{option}`, which only applies to {allowed}",
                contract.kind, contract.name
            ),
        )
    }

    fn error(&self, code: &str, contract: &AttributeContract, message: String) -> DefinitionError {
        DefinitionError::new(&self.name, code, message).with_attributes(vec![contract.name.clone()])
    }
}

/// Finds the first container or object shape whose type is not classified
/// in the scope. Scalars always resolve.
fn unresolved<'s>(shape: &'s TypeShape, scope: &ConfigurationScope) -> Option<(ClassificationMode, &'s str)> {
    let (mode, nested): (ClassificationMode, Vec<&TypeShape>) = match shape {
        TypeShape::Scalar { .. } => return None,
        TypeShape::ObjectLike { .. } => (ClassificationMode::ObjectLike, Vec::new()),
        TypeShape::CollectionOf { element, .. } => (ClassificationMode::CollectionLike, element.iter().collect()),
        TypeShape::HashOf { key, value, .. } => {
            (ClassificationMode::HashLike, key.iter().chain(value.iter()).collect())
        }
    };
    let type_name = shape.type_name().as_str();
    if !scope.contains(mode, type_name) {
        return Some((mode, type_name));
    }
    nested.into_iter().find_map(|inner| unresolved(inner, scope))
}

/// Serializable description of one attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeInfo {
    /// Declaration name.
    pub name: String,
    /// Alias, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Accepted shapes, rendered.
    pub types: Vec<String>,
    /// Whether the attribute is required.
    pub required: bool,
    /// Default value, as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Allowed values, as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<Vec<serde_json::Value>>,
    /// Names of dynamic checks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<String>,
    /// Documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&AttributeContract> for AttributeInfo {
    fn from(contract: &AttributeContract) -> Self {
        Self {
            name: contract.name.clone(),
            alias: contract.alias.clone(),
            types: contract.accepted_shapes.iter().map(ToString::to_string).collect(),
            required: contract.required,
            default: contract.default.as_ref().map(Value::to_json),
            inclusion: contract
                .inclusion
                .as_ref()
                .map(|values| values.iter().map(Value::to_json).collect()),
            checks: contract.checks.iter().map(|check| check.name().to_string()).collect(),
            note: contract.note.clone(),
        }
    }
}

/// Serializable description of a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitInfo {
    /// Unit name.
    pub name: String,
    /// Generation the unit belongs to.
    pub generation: Generation,
    /// Inputs.
    pub inputs: Vec<AttributeInfo>,
    /// Internal attributes.
    pub internals: Vec<AttributeInfo>,
    /// Outputs.
    pub outputs: Vec<AttributeInfo>,
    /// Step names in execution order.
    pub steps: Vec<String>,
}
