//! Sequential step execution.

use super::{ExecutionContext, Interrupt, Stage, Step, StepResult};
use crate::contracts::Violation;
use crate::core::AttributeKind;
use crate::outcome::Failure;

/// How the steps of one invocation ended.
#[derive(Debug)]
pub enum ExecutionResult {
    /// Every stage ran (or was skipped by its condition).
    Completed,
    /// A step asked to finish early.
    SucceededEarly,
    /// A step declared a business failure.
    Failed(Failure),
    /// An attribute contract broke while the steps ran.
    Invalid {
        /// Kind of the broken attributes.
        kind: AttributeKind,
        /// The violations.
        violations: Vec<Violation>,
    },
    /// A step raised a fault. It has not been rescued yet.
    Faulted(anyhow::Error),
}

/// Runs stages in registration order on one context, stopping at the first
/// failure.
#[derive(Debug, Clone, Copy)]
pub struct StepOrchestrator<'d> {
    stages: &'d [Stage],
}

impl<'d> StepOrchestrator<'d> {
    /// Creates an orchestrator over a unit's stages.
    #[must_use]
    pub const fn new(stages: &'d [Stage]) -> Self {
        Self { stages }
    }

    /// Runs every stage.
    pub fn run(&self, ctx: &mut ExecutionContext<'_>) -> ExecutionResult {
        for stage in self.stages {
            if let Err(error) = Self::run_stage(stage, ctx) {
                return Self::classify(error);
            }
        }
        ExecutionResult::Completed
    }

    fn run_stage(stage: &Stage, ctx: &mut ExecutionContext<'_>) -> StepResult {
        if !stage.should_run(ctx) {
            tracing::debug!(
                first_step = stage.steps.first().map(|step| step.name.as_str()),
                "Stage skipped"
            );
            return Ok(());
        }

        let result = match stage.wrapper() {
            Some(wrapper) => wrapper(ctx, &mut |inner| Self::run_steps(&stage.steps, inner)),
            None => Self::run_steps(&stage.steps, ctx),
        };

        match (result, stage.rollback_handler()) {
            (Err(error), Some(rollback)) if !is_early_success(&error) => {
                tracing::debug!(error = %error, "Rolling back stage");
                let rolled_back = rollback(ctx, &error);
                if !is_terminal(&error) {
                    return rolled_back;
                }
                if let Err(rollback_error) = rolled_back {
                    tracing::warn!(
                        error = %error,
                        rollback_error = %rollback_error,
                        "Rollback failed after the stage was halted"
                    );
                }
                Err(error)
            }
            (result, _) => result,
        }
    }

    fn run_steps(steps: &[Step], ctx: &mut ExecutionContext<'_>) -> StepResult {
        for step in steps {
            if !step.should_run(ctx) {
                tracing::debug!(step = %step.name, order = step.order, "Step skipped");
                continue;
            }
            tracing::debug!(step = %step.name, order = step.order, "Running step");
            step.run(ctx)?;
        }
        Ok(())
    }

    fn classify(error: anyhow::Error) -> ExecutionResult {
        match error.downcast::<Interrupt>() {
            Ok(Interrupt::Success) => ExecutionResult::SucceededEarly,
            Ok(Interrupt::Failure(failure)) => ExecutionResult::Failed(failure),
            Ok(Interrupt::Invalid { kind, violations }) => {
                ExecutionResult::Invalid { kind, violations }
            }
            Err(error) => match error.downcast::<Failure>() {
                Ok(failure) => ExecutionResult::Failed(failure),
                Err(fault) => ExecutionResult::Faulted(fault),
            },
        }
    }
}

fn is_early_success(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<Interrupt>(), Some(Interrupt::Success))
}

/// Declared failures and contract violations end the run even when a
/// rollback handles them. Only faults can be resumed.
fn is_terminal(error: &anyhow::Error) -> bool {
    error.downcast_ref::<Interrupt>().is_some() || error.downcast_ref::<Failure>().is_some()
}
