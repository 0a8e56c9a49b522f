//! Tracing integration for unit invocations.
//!
//! Every call opens a `unit.call` span. This module holds the attribute set
//! recorded when the call finishes, a timing helper, and a subscriber
//! installer for binaries and tests.

use crate::config::{Generation, ValidationMode};
use crate::outcome::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. With `json` set, events
/// are written as JSON lines.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is
/// already installed.
pub fn init_tracing(default_filter: &str, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow::anyhow!(err))
}

/// Span attributes for one unit invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitSpanAttributes {
    /// Unit name.
    pub unit_name: String,
    /// Invocation ID.
    pub invocation_id: Option<String>,
    /// Configuration generation.
    pub generation: Option<Generation>,
    /// Validation mode in effect.
    pub validation_mode: Option<ValidationMode>,
    /// `success` or the failure type.
    pub outcome: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
}

impl UnitSpanAttributes {
    /// Creates new unit span attributes.
    #[must_use]
    pub fn new(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            ..Default::default()
        }
    }

    /// Sets the invocation ID.
    #[must_use]
    pub fn with_invocation_id(mut self, id: impl ToString) -> Self {
        self.invocation_id = Some(id.to_string());
        self
    }

    /// Sets the generation.
    #[must_use]
    pub const fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Sets the validation mode.
    #[must_use]
    pub const fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = Some(mode);
        self
    }

    /// Records the outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: &Outcome) -> Self {
        self.outcome = Some(outcome.failure_type().unwrap_or("success").to_string());
        self
    }

    /// Sets the duration.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Converts to OpenTelemetry attributes.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        attrs.insert("unit.name".to_string(), self.unit_name.clone());

        if let Some(ref v) = self.invocation_id {
            attrs.insert("unit.invocation_id".to_string(), v.clone());
        }
        if let Some(v) = self.generation {
            attrs.insert("unit.generation".to_string(), v.to_string());
        }
        if let Some(v) = self.validation_mode {
            attrs.insert("unit.validation_mode".to_string(), v.to_string());
        }
        if let Some(ref v) = self.outcome {
            attrs.insert("unit.outcome".to_string(), v.clone());
        }
        if let Some(v) = self.duration_ms {
            attrs.insert("unit.duration_ms".to_string(), format!("{v:.2}"));
        }

        attrs
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Failure;

    #[test]
    fn test_unit_span_attributes() {
        let attrs = UnitSpanAttributes::new("CopyId")
            .with_invocation_id("inv-1")
            .with_generation(Generation::Legacy)
            .with_validation_mode(ValidationMode::Permissive)
            .with_outcome(&Outcome::BusinessFailure(Failure::with_status("not_found", "x")))
            .with_duration_ms(1.5);

        let otel = attrs.to_otel_attributes();
        assert_eq!(otel.get("unit.name"), Some(&"CopyId".to_string()));
        assert_eq!(otel.get("unit.invocation_id"), Some(&"inv-1".to_string()));
        assert_eq!(otel.get("unit.generation"), Some(&"legacy".to_string()));
        assert_eq!(otel.get("unit.validation_mode"), Some(&"permissive".to_string()));
        assert_eq!(otel.get("unit.outcome"), Some(&"not_found".to_string()));
        assert_eq!(otel.get("unit.duration_ms"), Some(&"1.50".to_string()));
    }

    #[test]
    fn test_minimal_attributes() {
        let otel = UnitSpanAttributes::new("Noop").to_otel_attributes();
        assert_eq!(otel.len(), 1);
    }

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start("test_span");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(timer.name(), "test_span");
        let duration = timer.finish();
        assert!(duration >= 10.0);
    }

    #[test]
    fn test_init_tracing_rejects_second_subscriber() {
        let _ = init_tracing("unitflow=debug", false);
        assert!(init_tracing("unitflow=debug", true).is_err());
    }
}
