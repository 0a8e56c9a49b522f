//! Value-against-contract validation.

use crate::contracts::{describe_union, AttributeContract, TypeShape, Violation, ViolationReason};
use crate::core::{AttributeKind, Value};
use crate::registry::{ClassificationMode, ClassificationRegistry};

/// A structural mismatch found below the attribute root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Mismatch {
    pub(super) path: String,
    pub(super) reason: ViolationReason,
    pub(super) expected: String,
    pub(super) given: String,
}

impl Mismatch {
    fn wrong_type(path: &str, shapes: &[TypeShape], value: &Value) -> Self {
        Self {
            path: path.to_string(),
            reason: ViolationReason::WrongType,
            expected: describe_union(shapes),
            given: value.type_name().to_string(),
        }
    }

    /// Re-labels a plain type mismatch with the container position it was found in.
    fn within(mut self, reason: ViolationReason) -> Self {
        if self.reason == ViolationReason::WrongType {
            self.reason = reason;
        }
        self
    }

    fn into_violation(self, contract: &AttributeContract) -> Violation {
        let detail = if self.path.is_empty() {
            format!("expected {}, got {}", self.expected, self.given)
        } else {
            format!("at {}: expected {}, got {}", self.path, self.expected, self.given)
        };
        Violation::new(contract.exposed_name(), contract.kind, self.reason, detail)
    }
}

enum ShapeMatch {
    Matched,
    /// The container matched but some members did not.
    Partial(Vec<Mismatch>),
    Rejected,
}

/// Checks values against attribute contracts.
///
/// Built per invocation from the resolved classification registry of the
/// unit's configuration scope.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r ClassificationRegistry,
}

impl<'r> Validator<'r> {
    /// Creates a validator over a resolved registry.
    #[must_use]
    pub const fn new(registry: &'r ClassificationRegistry) -> Self {
        Self { registry }
    }

    /// The registry classification decisions are made against.
    #[must_use]
    pub const fn registry(&self) -> &'r ClassificationRegistry {
        self.registry
    }

    /// Validates `value` against `contract`.
    ///
    /// `None` and [`Value::Nil`] both count as absent. Returns every violation
    /// found, or an empty list.
    #[must_use]
    pub fn validate(&self, contract: &AttributeContract, value: Option<&Value>) -> Vec<Violation> {
        let value = match value {
            Some(value) if !value.is_nil() => value,
            missing => {
                if contract.kind != AttributeKind::Output && contract.required {
                    let expected = describe_union(&contract.accepted_shapes);
                    let detail = match contract.alias.as_deref() {
                        Some(alias) if alias != contract.name => format!(
                            "is required (supplied as `{}` or `{alias}`), expected {expected}",
                            contract.name
                        ),
                        _ => format!("is required, expected {expected}"),
                    };
                    return vec![Violation::new(
                        contract.exposed_name(),
                        contract.kind,
                        ViolationReason::MissingRequired,
                        detail,
                    )];
                }
                match missing {
                    Some(nil) if contract.kind != AttributeKind::Input => {
                        return self.check_shapes(contract, nil);
                    }
                    _ => return Vec::new(),
                }
            }
        };

        let mut violations = self.check_shapes(contract, value);
        let type_matched = violations.is_empty();
        self.check_inclusion(contract, value, &mut violations);
        if type_matched {
            for check in &contract.checks {
                if let Err(detail) = check.evaluate(value) {
                    violations.push(Violation::new(
                        contract.exposed_name(),
                        contract.kind,
                        ViolationReason::CheckFailed,
                        format!("{}: {detail}", check.name()),
                    ));
                }
            }
            if let Some(schema) = &contract.schema {
                violations.extend(self.schema_mismatches(schema, value).into_iter().map(|detail| {
                    Violation::new(
                        contract.exposed_name(),
                        contract.kind,
                        ViolationReason::SchemaMismatch,
                        detail,
                    )
                }));
            }
        }
        violations
    }

    /// Validates and wraps the result in a [`ValidationReport`].
    #[must_use]
    pub fn report(&self, contract: &AttributeContract, value: Option<&Value>) -> ValidationReport {
        ValidationReport::new(self.validate(contract, value))
    }

    /// Returns `true` if `value` satisfies any shape of the union.
    #[must_use]
    pub fn matches_any(&self, shapes: &[TypeShape], value: &Value) -> bool {
        let mut ignored = Vec::new();
        self.match_union(shapes, value, "", &mut ignored)
    }

    fn check_shapes(&self, contract: &AttributeContract, value: &Value) -> Vec<Violation> {
        let mut mismatches = Vec::new();
        if self.match_union(&contract.accepted_shapes, value, "", &mut mismatches) {
            return Vec::new();
        }
        mismatches
            .into_iter()
            .map(|mismatch| mismatch.into_violation(contract))
            .collect()
    }

    fn check_inclusion(&self, contract: &AttributeContract, value: &Value, out: &mut Vec<Violation>) {
        let Some(allowed) = &contract.inclusion else {
            return;
        };
        let expected = allowed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        let collection = value
            .items()
            .filter(|_| self.registry.classifies(ClassificationMode::CollectionLike, value));

        if let Some(items) = collection {
            for (index, item) in items.iter().enumerate() {
                if !allowed.contains(item) {
                    out.push(Violation::new(
                        contract.exposed_name(),
                        contract.kind,
                        ViolationReason::NotIncluded,
                        format!("at [{index}]: {item} is not one of [{expected}]"),
                    ));
                }
            }
        } else if !allowed.contains(value) {
            out.push(Violation::new(
                contract.exposed_name(),
                contract.kind,
                ViolationReason::NotIncluded,
                format!("{value} is not one of [{expected}]"),
            ));
        }
    }

    /// Matches a union. On failure, pushes the mismatches of the first shape
    /// whose container matched, or one `WrongType` naming the whole union.
    pub(super) fn match_union(
        &self,
        shapes: &[TypeShape],
        value: &Value,
        path: &str,
        out: &mut Vec<Mismatch>,
    ) -> bool {
        let mut partial: Option<Vec<Mismatch>> = None;
        for shape in shapes {
            match self.match_shape(shape, value, path) {
                ShapeMatch::Matched => return true,
                ShapeMatch::Partial(mismatches) => {
                    partial.get_or_insert(mismatches);
                }
                ShapeMatch::Rejected => {}
            }
        }
        match partial {
            Some(mismatches) => out.extend(mismatches),
            None => out.push(Mismatch::wrong_type(path, shapes, value)),
        }
        false
    }

    fn match_shape(&self, shape: &TypeShape, value: &Value, path: &str) -> ShapeMatch {
        match shape {
            TypeShape::Scalar { type_name } => {
                if value.is_a(type_name.as_str()) {
                    ShapeMatch::Matched
                } else {
                    ShapeMatch::Rejected
                }
            }
            TypeShape::ObjectLike { type_name } => {
                if self.registry.classifies(ClassificationMode::ObjectLike, value)
                    && value.is_a(type_name.as_str())
                {
                    ShapeMatch::Matched
                } else {
                    ShapeMatch::Rejected
                }
            }
            TypeShape::CollectionOf { type_name, element } => {
                let Some(items) = value.items() else {
                    return ShapeMatch::Rejected;
                };
                if !value.is_a(type_name.as_str())
                    || !self.registry.classifies(ClassificationMode::CollectionLike, value)
                {
                    return ShapeMatch::Rejected;
                }
                let mut mismatches = Vec::new();
                for (index, item) in items.iter().enumerate() {
                    let mut found = Vec::new();
                    if !self.match_union(element, item, &format!("{path}[{index}]"), &mut found) {
                        mismatches.extend(
                            found
                                .into_iter()
                                .map(|mismatch| mismatch.within(ViolationReason::WrongElementType)),
                        );
                    }
                }
                Self::settle(mismatches)
            }
            TypeShape::HashOf {
                type_name,
                key: key_shapes,
                value: value_shapes,
            } => {
                let Some(entries) = value.entries() else {
                    return ShapeMatch::Rejected;
                };
                if !value.is_a(type_name.as_str())
                    || !self.registry.classifies(ClassificationMode::HashLike, value)
                {
                    return ShapeMatch::Rejected;
                }
                let mut mismatches = Vec::new();
                for (key, entry) in entries {
                    let mut found = Vec::new();
                    if !self.match_union(key_shapes, key, &format!("{path}{{{key}}}"), &mut found) {
                        mismatches.extend(
                            found
                                .drain(..)
                                .map(|mismatch| mismatch.within(ViolationReason::WrongKeyType)),
                        );
                    }
                    if !self.match_union(value_shapes, entry, &format!("{path}[{key}]"), &mut found) {
                        mismatches.extend(
                            found
                                .into_iter()
                                .map(|mismatch| mismatch.within(ViolationReason::WrongValueType)),
                        );
                    }
                }
                Self::settle(mismatches)
            }
        }
    }

    fn settle(mismatches: Vec<Mismatch>) -> ShapeMatch {
        if mismatches.is_empty() {
            ShapeMatch::Matched
        } else {
            ShapeMatch::Partial(mismatches)
        }
    }
}

/// The result of validating one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Wraps a list of violations.
    #[must_use]
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns `true` when nothing was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations with reason [`ViolationReason::MissingRequired`].
    #[must_use]
    pub fn missing_required(&self) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|violation| violation.reason == ViolationReason::MissingRequired)
            .collect()
    }

    /// All violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the report.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
