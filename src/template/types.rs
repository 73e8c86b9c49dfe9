//! Template types and error definitions

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid template name: {0}")]
    InvalidName(String),

    #[error("Invalid template {name}: {reason}")]
    Malformed { name: String, reason: String },

    #[error("Failed to read templates: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// An email template as stored on disk.
///
/// Only `subject` and `message` are needed to send; the rest is descriptive and
/// never blocks a send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(default, deserialize_with = "lenient")]
    pub template_name: String,

    /// Suggested sender details, free-form
    #[serde(default)]
    pub from: serde_json::Value,

    pub subject: String,

    pub message: String,

    /// Placeholder names the template expects
    #[serde(default, deserialize_with = "lenient")]
    pub variables: Vec<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub category: String,
}

/// Unreadable values (null, wrong type) fall back to the default
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Variable name to substitution value, supplied per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableBindings(HashMap<String, String>);

impl VariableBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableBindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Accepts any JSON object. Scalars are stringified, `null` leaves the name unbound.
impl<'de> Deserialize<'de> for VariableBindings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let bindings = raw
            .into_iter()
            .filter_map(|(name, value)| {
                let text = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                Some((name, text))
            })
            .collect();
        Ok(Self(bindings))
    }
}

/// A template file loaded into the tree
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub filename: String,
    /// File contents exactly as stored
    pub raw: String,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone)]
pub enum TemplateEntry {
    Category(CategoryNode),
    File(TemplateFile),
}

/// A category directory: files and sub-categories in listing order
#[derive(Debug, Clone)]
pub struct CategoryNode {
    pub name: String,
    pub entries: Vec<TemplateEntry>,
}

impl CategoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Append a template file built from a JSON value
    pub fn with_file(mut self, filename: impl Into<String>, content: serde_json::Value) -> Self {
        let raw = serde_json::to_string_pretty(&content).unwrap_or_default();
        self.entries.push(TemplateEntry::File(TemplateFile {
            filename: filename.into(),
            raw,
            content,
        }));
        self
    }

    pub fn with_child(mut self, child: CategoryNode) -> Self {
        self.entries.push(TemplateEntry::Category(child));
        self
    }

    /// Depth-first search in listing order
    pub fn find(&self, filename: &str) -> Option<&TemplateFile> {
        self.entries.iter().find_map(|entry| match entry {
            TemplateEntry::File(file) if file.filename == filename => Some(file),
            TemplateEntry::File(_) => None,
            TemplateEntry::Category(child) => child.find(filename),
        })
    }

    pub fn listing(&self, named: bool) -> CategoryListing {
        let mut listing = CategoryListing {
            name: named.then(|| self.name.clone()),
            files: Vec::new(),
            children: Vec::new(),
        };

        for entry in &self.entries {
            match entry {
                TemplateEntry::File(file) => listing.files.push(file.filename.clone()),
                TemplateEntry::Category(child) => listing.children.push(child.listing(true)),
            }
        }

        listing
    }

    /// Number of template files below this node
    pub fn file_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                TemplateEntry::File(_) => 1,
                TemplateEntry::Category(child) => child.file_count(),
            })
            .sum()
    }
}

/// One level of the template listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryListing {
    /// Present on child categories only; top-level categories are keyed by name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub files: Vec<String>,
    pub children: Vec<CategoryListing>,
}

/// Top-level categories in search order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap(pub Vec<(String, CategoryListing)>);

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, listing) in &self.0 {
            map.serialize_entry(name, listing)?;
        }
        map.end()
    }
}

/// Response for listing templates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateListing {
    pub templates: CategoryMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bindings_stringify_scalars() {
        let bindings: VariableBindings = serde_json::from_value(json!({
            "name": "Bob",
            "count": 3,
            "vip": true,
            "missing": null
        }))
        .unwrap();

        assert_eq!(bindings.get("name"), Some("Bob"));
        assert_eq!(bindings.get("count"), Some("3"));
        assert_eq!(bindings.get("vip"), Some("true"));
        assert_eq!(bindings.get("missing"), None);
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn test_document_defaults_optional_fields() {
        let doc: TemplateDocument =
            serde_json::from_value(json!({"subject": "Hi", "message": "Body"})).unwrap();
        assert_eq!(doc.subject, "Hi");
        assert!(doc.variables.is_empty());
        assert_eq!(doc.category, "");
    }

    #[test]
    fn test_document_tolerates_null_and_mistyped_descriptive_fields() {
        let doc: TemplateDocument = serde_json::from_value(json!({
            "template_name": null,
            "subject": "Hi",
            "message": "Body",
            "variables": [{"name": "first_name"}],
            "category": 7
        }))
        .unwrap();

        assert_eq!(doc.template_name, "");
        assert!(doc.variables.is_empty());
        assert_eq!(doc.category, "");
        assert_eq!(doc.message, "Body");
    }

    #[test]
    fn test_listing_keeps_category_order() {
        let listing = TemplateListing {
            templates: CategoryMap(vec![
                (
                    "Networking".to_string(),
                    CategoryNode::new("Networking").listing(false),
                ),
                (
                    "Follow-up".to_string(),
                    CategoryNode::new("Follow-up").listing(false),
                ),
            ]),
        };

        let text = serde_json::to_string(&listing).unwrap();
        let networking = text.find("Networking").unwrap();
        let follow_up = text.find("Follow-up").unwrap();
        assert!(networking < follow_up);
    }

    #[test]
    fn test_child_listing_carries_name() {
        let node = CategoryNode::new("Follow-up")
            .with_file("a.json", json!({"subject": "s", "message": "m"}))
            .with_child(CategoryNode::new("Events").with_file("b.json", json!({})));

        let value = serde_json::to_value(node.listing(false)).unwrap();
        assert_eq!(
            value,
            json!({
                "files": ["a.json"],
                "children": [{"name": "Events", "files": ["b.json"], "children": []}]
            })
        );
        assert_eq!(node.file_count(), 2);
    }
}
