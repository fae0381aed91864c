//! Catalog documents as served by the remote host

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One entry of the component index.
///
/// The entry is kept exactly as the catalog ships it and written back out
/// unchanged. `name` and `description` are read leniently: a missing or
/// non-string field simply yields `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentSummary(Value);

impl ComponentSummary {
    /// Create a summary with a name and description only.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self(json!({
            "name": name.into(),
            "description": description.into(),
        }))
    }

    /// Attach tags to the summary.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Value::Object(fields) = &mut self.0 {
            let tags: Vec<Value> = tags.into_iter().map(|t| Value::String(t.into())).collect();
            fields.insert("tags".to_string(), Value::Array(tags));
        }
        self
    }

    /// Component name, when the entry carries a string `name`.
    pub fn name(&self) -> Option<&str> {
        self.field("name").and_then(Value::as_str)
    }

    /// Short description, when the entry carries a string `description`.
    pub fn description(&self) -> Option<&str> {
        self.field("description").and_then(Value::as_str)
    }

    /// Any field of the entry, untouched.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for ComponentSummary {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Root document of the catalog (`index.json`).
///
/// Only the `components` array is required; its entries are not validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentIndex {
    /// Entries in the order the remote lists them
    pub components: Vec<ComponentSummary>,
}

/// Full specification of a single component.
///
/// The schema belongs to the catalog, so the document is carried as an
/// untyped JSON value and never validated here.
pub type ComponentSpec = Value;
