//! Schema conformance for hash values.

use super::Validator;
use crate::contracts::{describe_union, Schema};
use crate::core::{Value, NIL};
use crate::registry::ClassificationMode;

impl Validator<'_> {
    /// Checks a hash against a schema and returns one detail per failing key.
    ///
    /// Details carry the dotted key path, e.g. `` `address.city` ``.
    #[must_use]
    pub fn schema_mismatches(&self, schema: &Schema, value: &Value) -> Vec<String> {
        let mut details = Vec::new();
        self.walk_schema(schema, value, "", &mut details);
        details
    }

    fn walk_schema(&self, schema: &Schema, value: &Value, path: &str, out: &mut Vec<String>) {
        if value.entries().is_none() || !self.registry().classifies(ClassificationMode::HashLike, value) {
            let location = if path.is_empty() { "value" } else { path };
            out.push(format!("`{location}`: expected Hash, got {}", value.type_name()));
            return;
        }

        for field in &schema.fields {
            let key_path = if path.is_empty() {
                field.key.clone()
            } else {
                format!("{path}.{}", field.key)
            };
            let entry = value.get(&field.key).filter(|entry| !entry.is_nil());

            if let Some(nested) = &field.nested {
                match entry {
                    Some(entry) => self.walk_schema(nested, entry, &key_path, out),
                    None => {
                        let empty = Value::hash(Vec::<(Value, Value)>::new());
                        self.walk_schema(nested, &empty, &key_path, out);
                    }
                }
                continue;
            }

            let candidate = match entry {
                Some(entry) => entry,
                None if field.required => &NIL,
                None => match &field.default {
                    Some(default) => default,
                    None => continue,
                },
            };
            let mut ignored = Vec::new();
            if !self.match_union(&field.shapes, candidate, "", &mut ignored) {
                out.push(format!(
                    "`{key_path}`: expected {}, got {}",
                    describe_union(&field.shapes),
                    candidate.type_name()
                ));
            }
        }
    }
}
