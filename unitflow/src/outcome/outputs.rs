//! Validated output values.

use crate::core::Value;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Output values of a successful invocation, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Outputs {
    values: BTreeMap<String, Value>,
}

impl Outputs {
    /// Creates an empty set of outputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an output value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Truthiness of an output; absent outputs are falsy.
    #[must_use]
    pub fn query(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(Value::query)
    }

    /// Returns `true` if the output was set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of outputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no output was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Consumes the outputs.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.values
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Outputs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_are_sorted() {
        let outputs: Outputs = [
            ("zeta".to_string(), Value::Integer(1)),
            ("alpha".to_string(), Value::from("a")),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = outputs.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(outputs.len(), 2);
    }

    #[test]
    fn test_query() {
        let outputs: Outputs = [
            ("done".to_string(), Value::Boolean(true)),
            ("count".to_string(), Value::Integer(0)),
        ]
        .into_iter()
        .collect();

        assert!(outputs.query("done"));
        assert!(!outputs.query("count"));
        assert!(!outputs.query("missing"));
    }

    #[test]
    fn test_to_dict() {
        let outputs: Outputs = [("id".to_string(), Value::from("abc"))].into_iter().collect();
        assert_eq!(outputs.to_dict()["id"], "abc");
        assert_eq!(serde_json::to_value(&outputs).unwrap(), serde_json::json!({"id": "abc"}));
    }
}
