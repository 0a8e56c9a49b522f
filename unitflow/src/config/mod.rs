//! Process-wide configuration.
//!
//! [`Configuration`] holds one root [`ConfigurationScope`] per
//! [`Generation`]. Updates are copy-on-write: [`Configuration::configure`]
//! swaps in a new snapshot, so invocations that already resolved their scope
//! keep the settings they started with.

mod scope;

pub use scope::{ConfigurationScope, Generation, ScopeOverrides, ValidationMode};

use crate::errors::ConfigurationError;
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};

/// Environment variable holding the current generation's validation mode.
pub const VALIDATION_MODE_ENV: &str = "UNITFLOW_VALIDATION_MODE";
/// Environment variable holding the legacy generation's validation mode.
pub const LEGACY_VALIDATION_MODE_ENV: &str = "UNITFLOW_LEGACY_VALIDATION_MODE";

static GLOBAL_CONFIGURATION: LazyLock<Configuration> = LazyLock::new(|| {
    Configuration::from_env().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Ignoring invalid unitflow environment configuration");
        Configuration::new()
    })
});

/// Returns the process-wide configuration.
#[must_use]
pub fn global() -> &'static Configuration {
    &GLOBAL_CONFIGURATION
}

/// Root scopes of both generations.
#[derive(Debug)]
pub struct Configuration {
    current: RwLock<Arc<ConfigurationScope>>,
    legacy: RwLock<Arc<ConfigurationScope>>,
}

impl Configuration {
    /// Creates a configuration with default root scopes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(ConfigurationScope::root(Generation::Current))),
            legacy: RwLock::new(Arc::new(ConfigurationScope::root(Generation::Legacy))),
        }
    }

    /// Creates a configuration and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValidationMode`] if a mode
    /// variable holds an unknown value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let configuration = Self::new();
        for (generation, variable) in [
            (Generation::Current, VALIDATION_MODE_ENV),
            (Generation::Legacy, LEGACY_VALIDATION_MODE_ENV),
        ] {
            if let Ok(raw) = std::env::var(variable) {
                let mode: ValidationMode = raw.parse()?;
                configuration.configure(generation, |scope| scope.set_validation_mode(mode));
            }
        }
        Ok(configuration)
    }

    const fn slot(&self, generation: Generation) -> &RwLock<Arc<ConfigurationScope>> {
        match generation {
            Generation::Current => &self.current,
            Generation::Legacy => &self.legacy,
        }
    }

    /// Snapshot of a generation's root scope.
    #[must_use]
    pub fn scope(&self, generation: Generation) -> Arc<ConfigurationScope> {
        Arc::clone(&*self.slot(generation).read())
    }

    /// Updates a generation's root scope.
    ///
    /// The closure edits a copy; the copy replaces the snapshot when it returns.
    pub fn configure<F>(&self, generation: Generation, update: F)
    where
        F: FnOnce(&mut ConfigurationScope),
    {
        let mut slot = self.slot(generation).write();
        let mut next = ConfigurationScope::clone(&**slot);
        update(&mut next);
        *slot = Arc::new(next);
        tracing::debug!(generation = %generation, "Configuration updated");
    }

    /// Restores a generation's default root scope.
    pub fn reset(&self, generation: Generation) {
        *self.slot(generation).write() = Arc::new(ConfigurationScope::root(generation));
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
