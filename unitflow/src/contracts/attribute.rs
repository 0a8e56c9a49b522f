//! Attribute contracts.

use super::{AttributeCheck, Schema, TypeShape};
use crate::core::{AttributeKind, Value};
use std::fmt;
use std::sync::Arc;

/// Input transformation applied after validation.
pub type Prepare = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// The declared contract of one attribute.
#[derive(Clone)]
pub struct AttributeContract {
    /// Declaration name, unique within its kind.
    pub name: String,
    /// Role of the attribute.
    pub kind: AttributeKind,
    /// Union of accepted shapes.
    pub accepted_shapes: Vec<TypeShape>,
    /// Name the value is exposed under inside steps (inputs only).
    pub alias: Option<String>,
    /// Allowed values. Applied element-wise to collections.
    pub inclusion: Option<Vec<Value>>,
    /// Whether the value must be present. Ignored for outputs.
    pub required: bool,
    /// Documentation only.
    pub note: Option<String>,
    /// Value used for an absent optional input.
    pub default: Option<Value>,
    /// Dynamic checks run after the type check.
    pub checks: Vec<AttributeCheck>,
    /// Fixed-key schema for hash values.
    pub schema: Option<Schema>,
    /// Transformation applied to a validated input.
    pub prepare: Option<Prepare>,
}

impl AttributeContract {
    /// Creates a contract of the given kind with one accepted shape.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: AttributeKind, shape: TypeShape) -> Self {
        Self {
            name: name.into(),
            kind,
            accepted_shapes: vec![shape],
            alias: None,
            inclusion: None,
            required: kind != AttributeKind::Output,
            note: None,
            default: None,
            checks: Vec::new(),
            schema: None,
            prepare: None,
        }
    }

    /// A required input.
    #[must_use]
    pub fn input(name: impl Into<String>, shape: TypeShape) -> Self {
        Self::new(name, AttributeKind::Input, shape)
    }

    /// A required internal attribute.
    #[must_use]
    pub fn internal(name: impl Into<String>, shape: TypeShape) -> Self {
        Self::new(name, AttributeKind::Internal, shape)
    }

    /// An output.
    #[must_use]
    pub fn output(name: impl Into<String>, shape: TypeShape) -> Self {
        Self::new(name, AttributeKind::Output, shape)
    }

    /// Adds an accepted shape to the union. Duplicates are dropped.
    #[must_use]
    pub fn or_shape(mut self, shape: TypeShape) -> Self {
        if !self.accepted_shapes.contains(&shape) {
            self.accepted_shapes.push(shape);
        }
        self
    }

    /// Exposes the input under another name.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Marks the attribute optional.
    #[must_use]
    pub const fn optional(self) -> Self {
        self.with_required(false)
    }

    /// Sets whether the attribute is required.
    #[must_use]
    pub const fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the default of an optional input.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts the attribute to the given values.
    #[must_use]
    pub fn with_inclusion<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.inclusion = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Attaches documentation.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Adds a dynamic check.
    #[must_use]
    pub fn with_check(mut self, check: AttributeCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// Sets a fixed-key schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets the input transformation.
    #[must_use]
    pub fn with_prepare<F>(mut self, prepare: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.prepare = Some(Arc::new(prepare));
        self
    }

    /// Name the value is stored and looked up under inside steps.
    #[must_use]
    pub fn exposed_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Returns `true` if the attribute is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        !self.required
    }
}

impl fmt::Debug for AttributeContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeContract")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("accepted_shapes", &self.accepted_shapes)
            .field("alias", &self.alias)
            .field("inclusion", &self.inclusion)
            .field("required", &self.required)
            .field("note", &self.note)
            .field("default", &self.default)
            .field("checks", &self.checks)
            .field("schema", &self.schema)
            .field("prepare", &self.prepare.is_some())
            .finish()
    }
}
