//! Schema representation
//!
//! A [`Schema`] is an ordered map from keyword names to arbitrary JSON
//! values, always carrying a string `type` tag. It is immutable once
//! constructed and never mutated by the validator; the entry order is
//! significant because keywords are evaluated in declaration order.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{Result, ValidationError};

/// Declarative constraint object, keyed by keyword name plus a `type` tag
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    entries: IndexMap<String, Value>,
}

impl Schema {
    /// Create a schema declaring only its `type` tag
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        let mut entries = IndexMap::new();
        entries.insert("type".to_string(), Value::String(type_name.into()));
        Self { entries }
    }

    /// Add a keyword declaration, preserving insertion order
    #[must_use]
    pub fn with(mut self, keyword: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(keyword.into(), value.into());
        self
    }

    /// The declared `type` tag
    ///
    /// Both constructors guarantee a string `type`; a schema whose tag was
    /// overwritten with a non-string via [`Schema::with`] reads as empty and
    /// is rejected at validator construction.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.entries
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The declared `default` value, if any
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.entries.get("default")
    }

    /// Whether the schema declares a `default`
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.entries.contains_key("default")
    }

    /// Look up a declared keyword value
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.entries.get(keyword)
    }

    /// Whether a keyword is declared
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(keyword)
    }

    /// Iterate declared keywords in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of declared keywords, including `type`
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema declares nothing at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Value> for Schema {
    type Error = ValidationError;

    /// Build a schema from a JSON object, keeping field declaration order
    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ValidationError::invalid_schema(
                "schema must be a JSON object",
            ));
        };
        match map.get("type") {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ValidationError::invalid_schema(
                    "`type` keyword must be a string",
                ));
            }
            None => {
                return Err(ValidationError::invalid_schema(
                    "schema is missing the `type` keyword",
                ));
            }
        }
        Ok(Self {
            entries: map.into_iter().collect(),
        })
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let schema = Schema::new("number")
            .with("maximum", 10)
            .with("minimum", 5)
            .with("required", true);

        let keywords: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(keywords, vec!["type", "maximum", "minimum", "required"]);
    }

    #[test]
    fn test_try_from_object_keeps_declaration_order() {
        let schema = Schema::try_from(json!({
            "type": "string",
            "minLength": 2,
            "maxLength": 8,
        }))
        .expect("valid schema");

        assert_eq!(schema.type_name(), "string");
        let keywords: Vec<&str> = schema.iter().map(|(name, _)| name).collect();
        assert_eq!(keywords, vec!["type", "minLength", "maxLength"]);
    }

    #[test]
    fn test_try_from_rejects_malformed_schemas() {
        assert!(matches!(
            Schema::try_from(json!([1, 2])),
            Err(ValidationError::InvalidSchema { .. })
        ));
        assert!(matches!(
            Schema::try_from(json!({"minLength": 2})),
            Err(ValidationError::InvalidSchema { .. })
        ));
        assert!(matches!(
            Schema::try_from(json!({"type": 42})),
            Err(ValidationError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn test_default_accessors() {
        let schema = Schema::new("string").with("default", "fallback");
        assert!(schema.has_default());
        assert_eq!(schema.default_value(), Some(&json!("fallback")));

        let schema = Schema::new("string");
        assert!(!schema.has_default());
        assert_eq!(schema.default_value(), None);
    }
}
