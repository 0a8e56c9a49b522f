//! Test fixtures: sample units, objects and configurations.

use crate::config::Configuration;
use crate::contracts::{AttributeContract, TypeShape};
use crate::core::{TypeName, UnitObject, Value};
use crate::errors::DefinitionError;
use crate::unit::{UnitBuilder, UnitDefinition};
use std::any::Any;
use std::collections::HashMap;

/// A configuration that is not shared with the rest of the process.
#[must_use]
pub fn isolated_configuration() -> Configuration {
    Configuration::new()
}

/// A unit copying its `id` input (a `String`) to its `id` output.
///
/// # Errors
///
/// Returns an error if the unit cannot be built in `configuration`.
pub fn copy_id_unit(configuration: &Configuration) -> Result<UnitDefinition, DefinitionError> {
    UnitBuilder::new("CopyId")
        .attribute(AttributeContract::input("id", TypeShape::string()))
        .attribute(AttributeContract::output("id", TypeShape::string()))
        .step("copy", |ctx| {
            let id = ctx.input("id")?.clone();
            ctx.set_output("id", id)?;
            Ok(())
        })
        .build_in(configuration)
}

/// Builder for input mappings.
#[derive(Debug, Clone, Default)]
pub struct TestInputs {
    values: HashMap<String, Value>,
}

impl TestInputs {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an input.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl IntoIterator for TestInputs {
    type Item = (String, Value);
    type IntoIter = std::collections::hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// A user object with a configurable type name and ancestors.
#[derive(Debug, Clone)]
pub struct TestObject {
    type_name: String,
    ancestors: Vec<TypeName>,
}

impl TestObject {
    /// Creates an object of type `type_name`.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ancestors: Vec::new(),
        }
    }

    /// Adds a supertype.
    #[must_use]
    pub fn with_ancestor(mut self, ancestor: impl Into<TypeName>) -> Self {
        self.ancestors.push(ancestor.into());
        self
    }

    /// Wraps the object in a [`Value`].
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl UnitObject for TestObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn ancestors(&self) -> Vec<TypeName> {
        self.ancestors.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_output_value, assert_success};

    #[test]
    fn test_copy_id_unit() {
        let configuration = isolated_configuration();
        let unit = copy_id_unit(&configuration).unwrap();
        let outcome = unit.call_in(&configuration, TestInputs::new().with("id", "abc"));
        assert_success(&outcome);
        assert_output_value(&outcome, "id", &Value::from("abc"));
    }

    #[test]
    fn test_test_object_lineage() {
        let value = TestObject::new("Customer").with_ancestor("User").into_value();
        assert!(value.is_a("Customer"));
        assert!(value.is_a("User"));
        assert!(value.downcast_ref::<TestObject>().is_some());
    }
}
