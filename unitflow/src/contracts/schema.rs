//! Fixed-key hash schemas.

use super::TypeShape;
use crate::core::Value;

/// One key of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Key in the hash.
    pub key: String,
    /// Accepted shapes for the entry.
    pub shapes: Vec<TypeShape>,
    /// Whether the entry must be present.
    pub required: bool,
    /// Written into the hash when an optional entry is absent.
    pub default: Option<Value>,
    /// Nested schema for hash entries.
    pub nested: Option<Schema>,
}

impl SchemaField {
    /// A required field.
    #[must_use]
    pub fn new(key: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            key: key.into(),
            shapes: vec![shape],
            required: true,
            default: None,
            nested: None,
        }
    }

    /// A field holding a nested hash.
    #[must_use]
    pub fn nested(key: impl Into<String>, schema: Schema) -> Self {
        Self {
            key: key.into(),
            shapes: vec![TypeShape::any_hash()],
            required: true,
            default: None,
            nested: Some(schema),
        }
    }

    /// Marks the field optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the default for an absent optional entry.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Adds an accepted shape.
    #[must_use]
    pub fn or_shape(mut self, shape: TypeShape) -> Self {
        if !self.shapes.contains(&shape) {
            self.shapes.push(shape);
        }
        self
    }
}

/// An ordered list of expected hash keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Fields in declaration order.
    pub fields: Vec<SchemaField>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    #[must_use]
    pub fn field(self, key: impl Into<String>, shape: TypeShape) -> Self {
        self.with_field(SchemaField::new(key, shape))
    }

    /// Adds an optional field with an optional default.
    #[must_use]
    pub fn optional_field(self, key: impl Into<String>, shape: TypeShape, default: Option<Value>) -> Self {
        let mut field = SchemaField::new(key, shape).optional();
        field.default = default;
        self.with_field(field)
    }

    /// Adds a nested hash field.
    #[must_use]
    pub fn nested(self, key: impl Into<String>, schema: Self) -> Self {
        self.with_field(SchemaField::nested(key, schema))
    }

    /// Adds a prepared field.
    #[must_use]
    pub fn with_field(mut self, field: SchemaField) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns `true` if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Writes defaults of absent optional entries into `value`, recursively.
    ///
    /// Non-hash values are left untouched.
    pub fn apply_defaults(&self, value: &mut Value) {
        if value.entries().is_none() {
            return;
        }
        for field in &self.fields {
            let absent = value.get(&field.key).map_or(true, Value::is_nil);
            if let Some(nested) = &field.nested {
                if absent {
                    if !nested.has_defaults() {
                        continue;
                    }
                    value.insert(field.key.as_str(), Value::hash(Vec::<(Value, Value)>::new()));
                }
                if let Some(entry) = value.get_mut(&field.key) {
                    nested.apply_defaults(entry);
                }
            } else if absent && !field.required {
                if let Some(default) = &field.default {
                    value.insert(field.key.as_str(), default.clone());
                }
            }
        }
    }

    fn has_defaults(&self) -> bool {
        self.fields.iter().any(|field| {
            field.default.is_some() || field.nested.as_ref().is_some_and(Self::has_defaults)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn address_schema() -> Schema {
        Schema::new()
            .field("street", TypeShape::string())
            .optional_field("country", TypeShape::string(), Some(Value::from("NL")))
    }

    #[test]
    fn test_builder() {
        let schema = Schema::new()
            .field("name", TypeShape::string())
            .nested("address", address_schema());
        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields[1].nested.is_some());
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_apply_defaults_fills_absent_optional_keys() {
        let mut value = Value::hash([("street", "Main")]);
        address_schema().apply_defaults(&mut value);
        assert_eq!(value.get("country"), Some(&Value::from("NL")));
    }

    #[test]
    fn test_apply_defaults_keeps_present_values() {
        let mut value = Value::hash([("street", "Main"), ("country", "BE")]);
        address_schema().apply_defaults(&mut value);
        assert_eq!(value.get("country"), Some(&Value::from("BE")));
    }

    #[test]
    fn test_apply_defaults_creates_nested_hash() {
        let schema = Schema::new().nested("address", address_schema());
        let mut value = Value::hash(Vec::<(Value, Value)>::new());
        schema.apply_defaults(&mut value);
        let address = value.get("address").unwrap();
        assert_eq!(address.get("country"), Some(&Value::from("NL")));
    }
}
