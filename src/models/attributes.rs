// file: src/models/attributes.rs
// description: decoded front matter attributes keyed by string
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key-value attributes decoded from a front matter block.
///
/// Line-syntax blocks produce plain string values; structured blocks may
/// carry any JSON scalar, list, or map. Ordering is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    fields: Map<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String view of a value; non-string values return None.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Value)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut attrs = Attributes::new();
        attrs.insert("title", json!("Hello"));

        assert_eq!(attrs.get_str("title"), Some("Hello"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_get_str_rejects_non_strings() {
        let mut attrs = Attributes::new();
        attrs.insert("draft", json!(true));

        assert_eq!(attrs.get_str("draft"), None);
        assert_eq!(attrs.get("draft"), Some(&json!(true)));
    }

    #[test]
    fn test_serde_transparent_roundtrip() {
        let mut attrs = Attributes::new();
        attrs.insert("tags", json!(["rust", "build"]));

        let encoded = serde_json::to_string(&attrs).unwrap();
        let decoded: Attributes = serde_json::from_str(&encoded).unwrap();

        assert_eq!(attrs, decoded);
        assert!(encoded.starts_with('{'));
    }
}
