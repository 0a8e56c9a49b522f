//! Recording steps for testing.

use crate::outcome::Failure;
use crate::unit::{Interrupt, Step};
use parking_lot::Mutex;
use std::sync::Arc;

/// Produces steps that log their names when they run.
///
/// Clones share one log, so the recorder can be inspected after the unit
/// that owns its steps has run.
#[derive(Debug, Clone, Default)]
pub struct StepRecorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl StepRecorder {
    /// Creates a recorder with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A step that records its name and succeeds.
    #[must_use]
    pub fn step(&self, name: &str) -> Step {
        let calls = Arc::clone(&self.calls);
        let label = name.to_string();
        Step::new(name, move |_| {
            calls.lock().push(label.clone());
            Ok(())
        })
    }

    /// A step that records its name and declares a business failure.
    #[must_use]
    pub fn failing(&self, name: &str, status: &str, message: &str) -> Step {
        let calls = Arc::clone(&self.calls);
        let label = name.to_string();
        let failure = Failure::with_status(status, message);
        Step::new(name, move |_| {
            calls.lock().push(label.clone());
            Err(Interrupt::Failure(failure.clone()).into())
        })
    }

    /// A step that records its name and raises the error built by `fault`.
    #[must_use]
    pub fn faulting<F>(&self, name: &str, fault: F) -> Step
    where
        F: Fn() -> anyhow::Error + Send + Sync + 'static,
    {
        let calls = Arc::clone(&self.calls);
        let label = name.to_string();
        Step::new(name, move |_| {
            calls.lock().push(label.clone());
            Err(fault())
        })
    }

    /// Records a call from custom step logic.
    pub fn record(&self, name: impl Into<String>) {
        self.calls.lock().push(name.into());
    }

    /// Names of the steps that ran, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clears the log.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}
