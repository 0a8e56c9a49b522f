//! Rescue rules converting faults into outcomes.
//!
//! Rules are consulted in registration order and the first match wins.

use crate::outcome::Failure;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

type Matcher = Arc<dyn Fn(&anyhow::Error) -> bool + Send + Sync>;
type Converter = Arc<dyn Fn(&anyhow::Error) -> Resolution + Send + Sync>;

/// What a matched fault turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The invocation succeeds with the outputs set so far.
    Success,
    /// The invocation fails with a business failure.
    Failure(Failure),
}

impl Resolution {
    /// A `base` failure with the given message.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(message))
    }

    /// A failure with a custom status.
    #[must_use]
    pub fn fail_with_status(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure(Failure::with_status(status, message))
    }
}

/// Finds the first error of type `E` in the fault's cause chain that passes `guard`.
fn find_cause<'f, E, G>(fault: &'f anyhow::Error, guard: &G) -> Option<&'f E>
where
    E: StdError + Send + Sync + 'static,
    G: Fn(&E) -> bool + ?Sized,
{
    fault
        .downcast_ref::<E>()
        .into_iter()
        .chain(fault.chain().filter_map(|cause| cause.downcast_ref::<E>()))
        .find(|cause| guard(cause))
}

/// A matcher paired with a converter.
#[derive(Clone)]
pub struct RescueRule {
    /// Position in the chain, assigned on registration.
    pub order: usize,
    /// Label used in logs.
    pub label: String,
    matcher: Matcher,
    convert: Converter,
}

impl RescueRule {
    /// A rule with an arbitrary matcher.
    pub fn when<M, C>(label: impl Into<String>, matcher: M, convert: C) -> Self
    where
        M: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
        C: Fn(&anyhow::Error) -> Resolution + Send + Sync + 'static,
    {
        Self {
            order: 0,
            label: label.into(),
            matcher: Arc::new(matcher),
            convert: Arc::new(convert),
        }
    }

    /// Matches faults with an `E` anywhere in their cause chain.
    pub fn on<E, C>(convert: C) -> Self
    where
        E: StdError + Send + Sync + 'static,
        C: Fn(&E) -> Resolution + Send + Sync + 'static,
    {
        Self::on_guarded::<E, _, _>(|_| true, convert)
    }

    /// Matches faults with an `E` in their cause chain that also passes `guard`.
    pub fn on_guarded<E, G, C>(guard: G, convert: C) -> Self
    where
        E: StdError + Send + Sync + 'static,
        G: Fn(&E) -> bool + Send + Sync + 'static,
        C: Fn(&E) -> Resolution + Send + Sync + 'static,
    {
        let guard = Arc::new(guard);
        let matcher_guard = Arc::clone(&guard);
        Self::when(
            std::any::type_name::<E>(),
            move |fault| find_cause::<E, G>(fault, &*matcher_guard).is_some(),
            move |fault| {
                find_cause::<E, G>(fault, &*guard)
                    .map_or_else(|| Resolution::fail(fault.to_string()), &convert)
            },
        )
    }

    /// Returns `true` if the rule handles `fault`.
    #[must_use]
    pub fn matches(&self, fault: &anyhow::Error) -> bool {
        (self.matcher)(fault)
    }

    /// Converts `fault` into a resolution.
    #[must_use]
    pub fn convert(&self, fault: &anyhow::Error) -> Resolution {
        (self.convert)(fault)
    }
}

impl fmt::Debug for RescueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RescueRule")
            .field("order", &self.order)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Ordered rescue rules.
#[derive(Debug, Clone, Default)]
pub struct RescueChain {
    rules: Vec<RescueRule>,
}

impl RescueChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, assigning the next order.
    pub fn add(&mut self, mut rule: RescueRule) {
        rule.order = self.rules.len();
        self.rules.push(rule);
    }

    /// Appends a rule built from a matcher and a converter.
    pub fn register<M, C>(&mut self, matcher: M, convert: C)
    where
        M: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
        C: Fn(&anyhow::Error) -> Resolution + Send + Sync + 'static,
    {
        let label = format!("rule#{}", self.rules.len());
        self.add(RescueRule::when(label, matcher, convert));
    }

    /// Resolves `fault` with the first matching rule.
    #[must_use]
    pub fn resolve(&self, fault: &anyhow::Error) -> Option<Resolution> {
        let rule = self.rules.iter().find(|rule| rule.matches(fault))?;
        tracing::debug!(rule = %rule.label, order = rule.order, "Fault rescued");
        Some(rule.convert(fault))
    }

    /// Returns the registered rules in order.
    #[must_use]
    pub fn rules(&self) -> &[RescueRule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
