//! Steps and stages.

use super::ExecutionContext;
use std::fmt;
use std::sync::Arc;

/// Result of a step. Control signals travel as [`Interrupt`](super::Interrupt)s.
pub type StepResult = anyhow::Result<()>;

/// Business logic run by a step.
pub type StepAction = Arc<dyn Fn(&mut ExecutionContext<'_>) -> StepResult + Send + Sync>;

/// Predicate deciding whether a step or stage runs.
pub type Condition = Arc<dyn Fn(&ExecutionContext<'_>) -> bool + Send + Sync>;

/// Runs a stage's steps through the given callback, e.g. inside a transaction.
pub type Wrapper = Arc<
    dyn Fn(&mut ExecutionContext<'_>, &mut dyn FnMut(&mut ExecutionContext<'_>) -> StepResult) -> StepResult
        + Send
        + Sync,
>;

/// Invoked with the error when a step of the stage fails.
///
/// For a fault, returning `Ok` resumes with the next stage and returning
/// `Err` propagates. Declared failures and violations halt the run either way.
pub type Rollback = Arc<dyn Fn(&mut ExecutionContext<'_>, &anyhow::Error) -> StepResult + Send + Sync>;

#[derive(Clone)]
struct Guard {
    predicate: Condition,
    negate: bool,
}

impl Guard {
    fn allows(&self, ctx: &ExecutionContext<'_>) -> bool {
        (self.predicate)(ctx) != self.negate
    }
}

/// One unit of business logic.
#[derive(Clone)]
pub struct Step {
    /// Position in registration order, assigned by the builder.
    pub order: usize,
    /// Step name, used in logs.
    pub name: String,
    action: StepAction,
    guard: Option<Guard>,
}

impl Step {
    /// Creates a step.
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> StepResult + Send + Sync + 'static,
    {
        Self {
            order: 0,
            name: name.into(),
            action: Arc::new(action),
            guard: None,
        }
    }

    /// Runs the step only when `predicate` holds.
    #[must_use]
    pub fn only_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ExecutionContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard {
            predicate: Arc::new(predicate),
            negate: false,
        });
        self
    }

    /// Skips the step when `predicate` holds.
    #[must_use]
    pub fn only_unless<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ExecutionContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard {
            predicate: Arc::new(predicate),
            negate: true,
        });
        self
    }

    /// Returns `true` if the step should run on this context.
    #[must_use]
    pub fn should_run(&self, ctx: &ExecutionContext<'_>) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard.allows(ctx))
    }

    /// Runs the step's action.
    ///
    /// # Errors
    ///
    /// Returns whatever the action returns.
    pub fn run(&self, ctx: &mut ExecutionContext<'_>) -> StepResult {
        (self.action)(ctx)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("order", &self.order)
            .field("name", &self.name)
            .field("conditional", &self.guard.is_some())
            .finish_non_exhaustive()
    }
}

/// A group of steps sharing a condition, a wrapper and a rollback.
#[derive(Clone, Default)]
pub struct Stage {
    /// Steps in registration order.
    pub steps: Vec<Step>,
    guard: Option<Guard>,
    wrapper: Option<Wrapper>,
    rollback: Option<Rollback>,
}

impl Stage {
    /// Creates an empty stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    #[must_use]
    pub fn step<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> StepResult + Send + Sync + 'static,
    {
        self.steps.push(Step::new(name, action));
        self
    }

    /// Appends a prepared step.
    #[must_use]
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Runs the stage only when `predicate` holds.
    #[must_use]
    pub fn only_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ExecutionContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard {
            predicate: Arc::new(predicate),
            negate: false,
        });
        self
    }

    /// Skips the stage when `predicate` holds.
    #[must_use]
    pub fn only_unless<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&ExecutionContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard {
            predicate: Arc::new(predicate),
            negate: true,
        });
        self
    }

    /// Runs the stage's steps through `wrapper`.
    #[must_use]
    pub fn wrap_in<W>(mut self, wrapper: W) -> Self
    where
        W: Fn(&mut ExecutionContext<'_>, &mut dyn FnMut(&mut ExecutionContext<'_>) -> StepResult) -> StepResult
            + Send
            + Sync
            + 'static,
    {
        self.wrapper = Some(Arc::new(wrapper));
        self
    }

    /// Handles errors raised by the stage's steps.
    #[must_use]
    pub fn rollback<R>(mut self, rollback: R) -> Self
    where
        R: Fn(&mut ExecutionContext<'_>, &anyhow::Error) -> StepResult + Send + Sync + 'static,
    {
        self.rollback = Some(Arc::new(rollback));
        self
    }

    /// Returns `true` if the stage should run on this context.
    #[must_use]
    pub fn should_run(&self, ctx: &ExecutionContext<'_>) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard.allows(ctx))
    }

    pub(crate) fn wrapper(&self) -> Option<&Wrapper> {
        self.wrapper.as_ref()
    }

    pub(crate) fn rollback_handler(&self) -> Option<&Rollback> {
        self.rollback.as_ref()
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("steps", &self.steps)
            .field("conditional", &self.guard.is_some())
            .field("wrapped", &self.wrapper.is_some())
            .field("rollback", &self.rollback.is_some())
            .finish()
    }
}
