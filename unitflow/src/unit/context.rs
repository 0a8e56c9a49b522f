//! Per-invocation execution state.

use super::{Interrupt, StepResult, UnitDefinition};
use crate::config::ValidationMode;
use crate::contracts::{Violation, ViolationReason};
use crate::core::{AttributeKind, Value, NIL};
use crate::outcome::{Failure, Outcome, Outputs};
use crate::validation::{self, Validator};
use std::collections::HashMap;
use uuid::Uuid;

/// Mutable state shared by the steps of one invocation.
///
/// Inputs are read-only and keyed by their exposed name. Internal values are
/// validated on every write; outputs are validated once after the last step.
#[derive(Debug)]
pub struct ExecutionContext<'a> {
    definition: &'a UnitDefinition,
    validator: Validator<'a>,
    mode: ValidationMode,
    invocation_id: Uuid,
    inputs: HashMap<String, Value>,
    internals: HashMap<String, Value>,
    outputs: HashMap<String, Value>,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(
        definition: &'a UnitDefinition,
        validator: Validator<'a>,
        mode: ValidationMode,
        invocation_id: Uuid,
        inputs: HashMap<String, Value>,
    ) -> Self {
        Self {
            definition,
            validator,
            mode,
            invocation_id,
            inputs,
            internals: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    /// Name of the running unit.
    #[must_use]
    pub fn unit_name(&self) -> &str {
        self.definition.name()
    }

    /// Identifier of this invocation.
    #[must_use]
    pub const fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    /// Validation mode in effect.
    #[must_use]
    pub const fn validation_mode(&self) -> ValidationMode {
        self.mode
    }

    /// Reads an input by its exposed name.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupt::Invalid`] with an `undefined_attribute` violation
    /// if no input is exposed under `name`. An aliased input is only
    /// reachable through its alias.
    pub fn input(&self, name: &str) -> Result<&Value, Interrupt> {
        self.inputs
            .get(name)
            .ok_or_else(|| self.undefined(AttributeKind::Input, name))
    }

    /// Returns `true` if the input is exposed under `name` and not `nil`.
    #[must_use]
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.get(name).is_some_and(|value| !value.is_nil())
    }

    /// Truthiness of an input; unknown inputs are falsy.
    #[must_use]
    pub fn query_input(&self, name: &str) -> bool {
        self.inputs.get(name).is_some_and(Value::query)
    }

    /// Reads an internal value. Declared but unset values read as `nil`.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupt::Invalid`] if the internal is not declared.
    pub fn internal(&self, name: &str) -> Result<&Value, Interrupt> {
        if self.definition.internal_contract(name).is_none() {
            return Err(self.undefined(AttributeKind::Internal, name));
        }
        Ok(self.internals.get(name).unwrap_or(&NIL))
    }

    /// Truthiness of an internal value; undeclared or unset values are falsy.
    #[must_use]
    pub fn query_internal(&self, name: &str) -> bool {
        self.internals.get(name).is_some_and(Value::query)
    }

    /// Writes an internal value after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupt::Invalid`] if the internal is not declared or the
    /// value breaks its contract under the active validation mode.
    pub fn set_internal(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Interrupt> {
        let Some(contract) = self.definition.internal_contract(name) else {
            return Err(self.undefined(AttributeKind::Internal, name));
        };
        let value = value.into();
        let violations = self.validator.validate(contract, Some(&value));
        validation::enforce(self.mode, violations).map_err(|violations| Interrupt::Invalid {
            kind: AttributeKind::Internal,
            violations,
        })?;
        self.internals.insert(name.to_string(), value);
        Ok(())
    }

    /// Reads an output set earlier. Declared but unset outputs read as `nil`.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupt::Invalid`] if the output is not declared.
    pub fn output(&self, name: &str) -> Result<&Value, Interrupt> {
        if self.definition.output_contract(name).is_none() {
            return Err(self.undefined(AttributeKind::Output, name));
        }
        Ok(self.outputs.get(name).unwrap_or(&NIL))
    }

    /// Sets an output. Values are validated after the last step.
    ///
    /// # Errors
    ///
    /// Returns [`Interrupt::Invalid`] if the output is not declared.
    pub fn set_output(&mut self, name: &str, value: impl Into<Value>) -> Result<(), Interrupt> {
        if self.definition.output_contract(name).is_none() {
            return Err(self.undefined(AttributeKind::Output, name));
        }
        self.outputs.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Ends the run with a `base` business failure.
    ///
    /// # Errors
    ///
    /// Always returns the failure, ready to be returned from a step.
    pub fn fail(&self, message: impl Into<String>) -> StepResult {
        self.fail_with(Failure::new(message))
    }

    /// Ends the run with the given business failure.
    ///
    /// # Errors
    ///
    /// Always returns the failure, ready to be returned from a step.
    pub fn fail_with(&self, failure: Failure) -> StepResult {
        tracing::debug!(
            unit = %self.unit_name(),
            status = %failure.status,
            "Step declared failure"
        );
        Err(Interrupt::Failure(failure).into())
    }

    /// Ends the run with a business failure blamed on one input.
    ///
    /// # Errors
    ///
    /// Always returns the failure, ready to be returned from a step.
    pub fn fail_input(&self, name: &str, message: impl Into<String>) -> StepResult {
        self.fail_with(Failure::input(name, message))
    }

    /// Ends the run successfully, skipping the remaining steps.
    ///
    /// Outputs set so far are still validated.
    ///
    /// # Errors
    ///
    /// Always returns the signal, ready to be returned from a step.
    pub fn succeed(&self) -> StepResult {
        tracing::debug!(unit = %self.unit_name(), "Step requested early success");
        Err(Interrupt::Success.into())
    }

    fn undefined(&self, kind: AttributeKind, name: &str) -> Interrupt {
        let aliased = match kind {
            AttributeKind::Input => self
                .definition
                .input_contract(name)
                .and_then(|contract| contract.alias.as_deref()),
            AttributeKind::Internal | AttributeKind::Output => None,
        };
        let detail = aliased.map_or_else(
            || format!("no {kind} named `{name}` is declared by {}", self.unit_name()),
            |alias| format!("is exposed as `{alias}`"),
        );
        Interrupt::Invalid {
            kind,
            violations: vec![Violation::new(
                name,
                kind,
                ViolationReason::UndefinedAttribute,
                detail,
            )],
        }
    }

    /// Validates declared outputs and produces the final outcome.
    pub(crate) fn finish(self) -> Outcome {
        let violations = self
            .definition
            .outputs()
            .iter()
            .flat_map(|contract| self.validator.validate(contract, self.outputs.get(&contract.name)))
            .collect();
        match validation::enforce(self.mode, violations) {
            Ok(()) => Outcome::Success(self.outputs.into_iter().collect::<Outputs>()),
            Err(violations) => Outcome::ValidationFailure {
                kind: AttributeKind::Output,
                violations,
            },
        }
    }
}
