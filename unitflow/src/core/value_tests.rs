//! Tests for the runtime value model.

#[cfg(test)]
mod tests {
    use crate::core::{TypeName, UnitObject, Value};
    use pretty_assertions::assert_eq;
    use std::any::Any;

    #[derive(Debug)]
    struct Admin;

    impl UnitObject for Admin {
        fn type_name(&self) -> &str {
            "Admin"
        }

        fn ancestors(&self) -> Vec<TypeName> {
            vec![TypeName::new("User")]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_builtin_lineage() {
        assert_eq!(
            Value::Integer(1).lineage(),
            vec![TypeName::new("Integer"), TypeName::new("Numeric"), TypeName::new("Object")]
        );
        assert_eq!(
            Value::Nil.lineage(),
            vec![TypeName::new("NilClass"), TypeName::new("Object")]
        );
        assert!(Value::Float(1.5).is_a("Numeric"));
        assert!(Value::from("x").is_a("Object"));
        assert!(!Value::Integer(1).is_a("String"));
    }

    #[test]
    fn test_object_lineage_includes_ancestors() {
        let admin = Value::object(Admin);
        assert_eq!(admin.type_name(), "Admin");
        assert!(admin.is_a("Admin"));
        assert!(admin.is_a("User"));
        assert!(admin.is_a("Object"));
        assert!(!admin.is_a("Hash"));
        assert!(admin.downcast_ref::<Admin>().is_some());
    }

    #[test]
    fn test_custom_collection_type_name() {
        let tags = Value::seq("TagList", ["a", "b"]);
        assert_eq!(tags.type_name(), "TagList");
        assert!(!tags.is_a("Array"));
        assert_eq!(tags.len(), Some(2));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let first = Value::object(Admin);
        let copy = first.clone();
        let second = Value::object(Admin);
        assert_eq!(first, copy);
        assert_ne!(first, second);
    }

    #[test]
    fn test_query_truthiness() {
        for falsy in [
            Value::Nil,
            Value::Boolean(false),
            Value::Integer(0),
            Value::from("0"),
            Value::from("f"),
            Value::from("FALSE"),
            Value::from("off"),
            Value::from("  "),
            Value::array(Vec::<Value>::new()),
        ] {
            assert!(!falsy.query(), "{falsy} should be falsy");
        }
        for truthy in [Value::Boolean(true), Value::Integer(2), Value::from("yes"), Value::array([1])] {
            assert!(truthy.query(), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(serde_json::json!({"id": 7, "tags": ["a"], "ratio": 0.5, "gone": null}));
        assert_eq!(value.type_name(), "Hash");
        assert_eq!(value.get("id"), Some(&Value::Integer(7)));
        assert_eq!(value.get("tags"), Some(&Value::array(["a"])));
        assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(value.get("gone"), Some(&Value::Nil));
    }

    #[test]
    fn test_serialize_to_json() {
        let value = Value::hash([("name", Value::from("Ada")), ("owner", Value::object(Admin))]);
        assert_eq!(
            value.to_json(),
            serde_json::json!({"name": "Ada", "owner": "#<Admin>"})
        );
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut value = Value::hash([("a", 1)]);
        assert!(value.insert("a", 2));
        assert!(value.insert("b", 3));
        assert_eq!(value.get("a"), Some(&Value::Integer(2)));
        assert_eq!(value.len(), Some(2));
        assert!(!Value::Integer(1).insert("a", 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::array([Value::from("a"), Value::Integer(1)]).to_string(), r#"["a", 1]"#);
        assert_eq!(Value::hash([("k", true)]).to_string(), r#"{"k" => true}"#);
        assert_eq!(Value::Nil.to_string(), "nil");
    }
}
