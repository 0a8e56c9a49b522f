//! Invoking a unit.

use super::{ExecutionContext, ExecutionResult, Resolution, StepOrchestrator, UnitDefinition};
use crate::config::{self, Configuration, ConfigurationScope, ValidationMode};
use crate::contracts::{Violation, ViolationReason};
use crate::core::{AttributeKind, Value};
use crate::observability::{SpanTimer, UnitSpanAttributes};
use crate::outcome::Outcome;
use crate::validation::{self, Validator};
use std::collections::HashMap;
use uuid::Uuid;

impl UnitDefinition {
    /// Invokes the unit with the process-wide configuration.
    ///
    /// Keys may be declaration names or aliases.
    pub fn call<I, K, V>(&self, inputs: I) -> Outcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.call_in(config::global(), inputs)
    }

    /// Invokes the unit with an explicit configuration.
    ///
    /// The configuration is resolved once, when the call starts.
    pub fn call_in<I, K, V>(&self, configuration: &Configuration, inputs: I) -> Outcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let raw = inputs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.invoke(configuration, raw)
    }

    /// Invokes the unit with a JSON object of named inputs.
    pub fn call_json(&self, inputs: serde_json::Value) -> Outcome {
        match inputs {
            serde_json::Value::Object(entries) => self.call(entries),
            serde_json::Value::Null => self.call(Vec::<(String, Value)>::new()),
            other => Outcome::ValidationFailure {
                kind: AttributeKind::Input,
                violations: vec![Violation::new(
                    self.name(),
                    AttributeKind::Input,
                    ViolationReason::WrongType,
                    format!(
                        "expected an object of named inputs, got {}",
                        Value::from(other).type_name()
                    ),
                )],
            },
        }
    }

    fn invoke(&self, configuration: &Configuration, raw: HashMap<String, Value>) -> Outcome {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "unit.call",
            unit = %self.name(),
            invocation_id = %invocation_id,
            generation = %self.generation(),
        );
        let _entered = span.enter();
        let timer = SpanTimer::start(self.name());

        let scope = match ConfigurationScope::child_of(configuration.scope(self.generation()), self.overrides()) {
            Ok(scope) => scope,
            Err(err) => return Outcome::FatalFault(err.into()),
        };
        let mode = scope.validation_mode();
        let registry = scope.resolved_registry();
        let validator = Validator::new(&registry);

        let outcome = match self.prepare_inputs(&validator, mode, raw) {
            Err(violations) => Outcome::ValidationFailure {
                kind: AttributeKind::Input,
                violations,
            },
            Ok(inputs) => {
                let mut ctx = ExecutionContext::new(self, validator, mode, invocation_id, inputs);
                let result = StepOrchestrator::new(self.stages()).run(&mut ctx);
                self.conclude(ctx, result)
            }
        };

        let attributes = UnitSpanAttributes::new(self.name())
            .with_invocation_id(invocation_id)
            .with_generation(self.generation())
            .with_validation_mode(mode)
            .with_outcome(&outcome)
            .with_duration_ms(timer.finish());
        tracing::info!(
            outcome = attributes.outcome.as_deref().unwrap_or("success"),
            duration_ms = attributes.duration_ms,
            attributes = ?attributes.to_otel_attributes(),
            "Unit finished"
        );
        outcome
    }

    /// Maps raw inputs to exposed names, applies defaults, validates, then
    /// applies schema defaults and `prepare`.
    fn prepare_inputs(
        &self,
        validator: &Validator<'_>,
        mode: ValidationMode,
        mut raw: HashMap<String, Value>,
    ) -> Result<HashMap<String, Value>, Vec<Violation>> {
        let mut violations = Vec::new();
        let mut resolved = HashMap::new();

        for contract in self.inputs() {
            let supplied = raw
                .remove(&contract.name)
                .or_else(|| contract.alias.as_ref().and_then(|alias| raw.remove(alias)));
            let value = match supplied {
                Some(value) if !value.is_nil() => Some(value),
                other if !contract.required => contract.default.clone().or(other),
                other => other,
            };
            violations.extend(validator.validate(contract, value.as_ref()));
            resolved.insert(contract.exposed_name().to_string(), value.unwrap_or_default());
        }

        let mut unexpected: Vec<String> = raw.into_keys().collect();
        unexpected.sort_unstable();
        violations.extend(unexpected.into_iter().map(|key| {
            Violation::new(
                key,
                AttributeKind::Input,
                ViolationReason::UnexpectedInput,
                format!("is not declared by {}", self.name()),
            )
        }));

        validation::enforce(mode, violations)?;

        for contract in self.inputs() {
            let Some(value) = resolved.get_mut(contract.exposed_name()) else {
                continue;
            };
            if let Some(schema) = &contract.schema {
                schema.apply_defaults(value);
            }
            if let Some(prepare) = &contract.prepare {
                *value = prepare(std::mem::take(value));
            }
        }
        Ok(resolved)
    }

    fn conclude(&self, ctx: ExecutionContext<'_>, result: ExecutionResult) -> Outcome {
        match result {
            ExecutionResult::Completed | ExecutionResult::SucceededEarly => ctx.finish(),
            ExecutionResult::Failed(failure) => Outcome::BusinessFailure(failure),
            ExecutionResult::Invalid { kind, violations } => Outcome::ValidationFailure { kind, violations },
            ExecutionResult::Faulted(fault) => match self.rescue_chain().resolve(&fault) {
                Some(Resolution::Success) => ctx.finish(),
                Some(Resolution::Failure(mut failure)) => {
                    failure
                        .meta
                        .entry("original_fault".to_string())
                        .or_insert_with(|| serde_json::Value::String(format!("{fault:#}")));
                    Outcome::BusinessFailure(failure)
                }
                None => {
                    tracing::error!(error = %format!("{fault:#}"), "Unhandled fault");
                    Outcome::FatalFault(fault)
                }
            },
        }
    }
}
