//! Unit builder with declaration checks.

use super::{ExecutionContext, RescueChain, RescueRule, Stage, Step, StepResult, UnitDefinition};
use crate::config::{self, Configuration, Generation, ScopeOverrides, ValidationMode};
use crate::contracts::AttributeContract;
use crate::core::AttributeKind;
use crate::errors::DefinitionError;
use crate::registry::ClassificationMode;

/// Builder for [`UnitDefinition`]s.
#[derive(Debug, Clone)]
pub struct UnitBuilder {
    name: String,
    attributes: Vec<AttributeContract>,
    stages: Vec<Stage>,
    rescue: RescueChain,
    overrides: ScopeOverrides,
    next_order: usize,
}

impl UnitBuilder {
    /// Creates a builder for a unit called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            stages: Vec::new(),
            rescue: RescueChain::new(),
            overrides: ScopeOverrides::new(),
            next_order: 0,
        }
    }

    /// Declares an attribute. The contract's kind decides where it goes.
    #[must_use]
    pub fn attribute(mut self, contract: AttributeContract) -> Self {
        self.attributes.push(contract);
        self
    }

    /// Registers a step in its own stage.
    #[must_use]
    pub fn step<F>(self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> StepResult + Send + Sync + 'static,
    {
        self.with_step(Step::new(name, action))
    }

    /// Registers a prepared step (e.g. with a condition) in its own stage.
    #[must_use]
    pub fn with_step(self, step: Step) -> Self {
        self.stage(Stage::new().with_step(step))
    }

    /// Registers a stage. Its steps get the next orders.
    #[must_use]
    pub fn stage(mut self, mut stage: Stage) -> Self {
        for step in &mut stage.steps {
            step.order = self.next_order;
            self.next_order += 1;
        }
        self.stages.push(stage);
        self
    }

    /// Appends a rescue rule. Earlier rules take precedence.
    #[must_use]
    pub fn rescue(mut self, rule: RescueRule) -> Self {
        self.rescue.add(rule);
        self
    }

    /// Overrides the validation mode for this unit.
    #[must_use]
    pub const fn validation_mode(mut self, mode: ValidationMode) -> Self {
        self.overrides.validation_mode = Some(mode);
        self
    }

    /// Places the unit in a configuration generation.
    #[must_use]
    pub const fn generation(mut self, generation: Generation) -> Self {
        self.overrides.generation = generation;
        self
    }

    /// Adds a classification entry visible to this unit only.
    #[must_use]
    pub fn classify(mut self, mode: ClassificationMode, type_name: impl Into<String>) -> Self {
        self.overrides.registry.register(mode, type_name);
        self
    }

    /// Returns the unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of registered steps.
    #[must_use]
    pub const fn step_count(&self) -> usize {
        self.next_order
    }

    /// Builds the unit against the process-wide configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if a declaration rule is broken.
    pub fn build(self) -> Result<UnitDefinition, DefinitionError> {
        self.build_in(config::global())
    }

    /// Builds the unit against an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if a declaration rule is broken.
    pub fn build_in(self, configuration: &Configuration) -> Result<UnitDefinition, DefinitionError> {
        let mut inputs = Vec::new();
        let mut internals = Vec::new();
        let mut outputs = Vec::new();
        for contract in self.attributes {
            match contract.kind {
                AttributeKind::Input => inputs.push(contract),
                AttributeKind::Internal => internals.push(contract),
                AttributeKind::Output => outputs.push(contract),
            }
        }

        let definition = UnitDefinition {
            name: self.name,
            inputs,
            internals,
            outputs,
            stages: self.stages,
            rescue: self.rescue,
            overrides: self.overrides,
        };
        definition.check(configuration)?;
        tracing::debug!(
            unit = %definition.name,
            generation = %definition.generation(),
            steps = definition.step_count(),
            "Unit built"
        );
        Ok(definition)
    }
}
