//! Read-only view over pre-parsed configuration documents.
//!
//! Parsing works on any nested mapping implementing [`RawNode`], so the same
//! validation applies to TOML files and to JSON documents handed in by an
//! integrating tool.

/// A node of a pre-parsed nested mapping (table, string, or other scalar).
pub trait RawNode {
    /// Whether this node represents an explicit "no value" (JSON `null`).
    fn is_null(&self) -> bool;

    /// The string value, if this node is a string.
    fn as_str(&self) -> Option<&str>;

    /// The entries of this node, if it is a table/object.
    fn entries(&self) -> Option<Vec<(&str, &Self)>>;

    /// Look up a child by key, if this node is a table/object.
    fn get(&self, key: &str) -> Option<&Self>;

    /// Human-readable type name used in error messages.
    fn type_name(&self) -> &'static str;
}

impl RawNode for toml::Value {
    fn is_null(&self) -> bool {
        false
    }

    fn as_str(&self) -> Option<&str> {
        toml::Value::as_str(self)
    }

    fn entries(&self) -> Option<Vec<(&str, &Self)>> {
        self.as_table()
            .map(|table| table.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }

    fn get(&self, key: &str) -> Option<&Self> {
        self.as_table().and_then(|table| table.get(key))
    }

    fn type_name(&self) -> &'static str {
        self.type_str()
    }
}

impl RawNode for serde_json::Value {
    fn is_null(&self) -> bool {
        serde_json::Value::is_null(self)
    }

    fn as_str(&self) -> Option<&str> {
        serde_json::Value::as_str(self)
    }

    fn entries(&self) -> Option<Vec<(&str, &Self)>> {
        self.as_object()
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }

    fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(key))
    }

    fn type_name(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toml_node() {
        let value: toml::Value = toml::from_str("a = \"x\"\n[t]\nb = 1\n").unwrap();
        assert_eq!(RawNode::as_str(RawNode::get(&value, "a").unwrap()), Some("x"));
        assert_eq!(RawNode::get(&value, "t").unwrap().entries().unwrap().len(), 1);
        assert_eq!(RawNode::get(&value, "t").unwrap().get("b").unwrap().type_name(), "integer");
        assert!(!RawNode::is_null(&value));
    }

    #[test]
    fn test_json_node() {
        let value = json!({"a": null, "b": [1], "c": {"d": "e"}});
        assert!(RawNode::is_null(RawNode::get(&value, "a").unwrap()));
        assert_eq!(RawNode::get(&value, "b").unwrap().type_name(), "array");
        assert!(RawNode::get(&value, "b").unwrap().entries().is_none());
        assert_eq!(
            RawNode::as_str(RawNode::get(&value, "c").unwrap().get("d").unwrap()),
            Some("e")
        );
    }
}
