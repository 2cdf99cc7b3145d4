//! GUID-keyed product data.
//!
//! The data source is an arbitrarily nested JSON document. Entries that carry
//! a `"guid"` hold the value for the schema property with that ISO 22057 GUID
//! under `"value"`, and indicator rows hold their per-module cells under
//! `"values"`:
//!
//! ```text
//! { "product": { "name": { "guid": "…", "value": "Concrete" } },
//!   "indicators": [ { "guid": "<row>", "values": [ { "guid": "<A1>", "value": 5 } ] } ] }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Number, Value as Json};

use crate::Result;

pub const GUID_KEY: &str = "guid";
pub const VALUE_KEY: &str = "value";
pub const VALUES_KEY: &str = "values";

// ============================================================================
// DataNode
// ============================================================================

/// Leaf of the data tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

/// A node of the data tree; mapping entries keep document order.
#[derive(Debug, Clone, PartialEq)]
pub enum DataNode {
    Mapping(Vec<(String, DataNode)>),
    Sequence(Vec<DataNode>),
    Scalar(Scalar),
}

impl From<Json> for DataNode {
    fn from(value: Json) -> Self {
        match value {
            Json::Null => DataNode::Scalar(Scalar::Null),
            Json::Bool(b) => DataNode::Scalar(Scalar::Bool(b)),
            Json::Number(n) => DataNode::Scalar(Scalar::Number(n)),
            Json::String(s) => DataNode::Scalar(Scalar::Text(s)),
            Json::Array(items) => DataNode::Sequence(items.into_iter().map(Into::into).collect()),
            Json::Object(map) => {
                DataNode::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&DataNode> for Json {
    fn from(node: &DataNode) -> Self {
        match node {
            DataNode::Scalar(Scalar::Null) => Json::Null,
            DataNode::Scalar(Scalar::Bool(b)) => Json::Bool(*b),
            DataNode::Scalar(Scalar::Number(n)) => Json::Number(n.clone()),
            DataNode::Scalar(Scalar::Text(s)) => Json::String(s.clone()),
            DataNode::Sequence(items) => Json::Array(items.iter().map(Into::into).collect()),
            DataNode::Mapping(entries) => Json::Object(
                entries.iter().map(|(k, v)| (k.clone(), Json::from(v))).collect(),
            ),
        }
    }
}

impl DataNode {
    pub fn is_null(&self) -> bool {
        matches!(self, DataNode::Scalar(Scalar::Null))
    }

    /// Entry of a mapping.
    pub fn get(&self, key: &str) -> Option<&DataNode> {
        match self {
            DataNode::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataNode::Scalar(Scalar::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Null, false, zero, empty text and empty containers are all "no value".
    pub fn is_truthy(&self) -> bool {
        match self {
            DataNode::Scalar(Scalar::Null) => false,
            DataNode::Scalar(Scalar::Bool(b)) => *b,
            DataNode::Scalar(Scalar::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            DataNode::Scalar(Scalar::Text(s)) => !s.is_empty(),
            DataNode::Sequence(items) => !items.is_empty(),
            DataNode::Mapping(entries) => !entries.is_empty(),
        }
    }

    /// Raw text handed to coercion, `None` for values that are not truthy.
    ///
    /// Sequences are joined with `;`, the list delimiter of the schema.
    pub fn raw_text(&self) -> Option<String> {
        if !self.is_truthy() {
            return None;
        }
        Some(match self {
            DataNode::Scalar(Scalar::Text(s)) => s.clone(),
            DataNode::Scalar(Scalar::Number(n)) => n.to_string(),
            DataNode::Scalar(Scalar::Bool(b)) => b.to_string(),
            DataNode::Scalar(Scalar::Null) => return None,
            DataNode::Sequence(items) => items
                .iter()
                .map(|i| i.raw_text().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(";"),
            DataNode::Mapping(_) => Json::from(self).to_string(),
        })
    }

    /// Depth-first search for the mapping whose `"guid"` equals `identifier`.
    ///
    /// Mapping entries are visited in document order, so entries before the
    /// `"guid"` key are searched first. A matching mapping answers with its
    /// `key` entry and is not searched further; if that entry is missing or
    /// null the search carries on in the remaining branches.
    pub fn resolve(&self, identifier: &str, key: &str) -> Option<&DataNode> {
        match self {
            DataNode::Mapping(entries) => {
                for (k, v) in entries {
                    if k == GUID_KEY && v.as_str() == Some(identifier) {
                        return self.get(key).filter(|n| !n.is_null());
                    }
                    if let Some(found) = v.resolve(identifier, key) {
                        return Some(found);
                    }
                }
                None
            }
            DataNode::Sequence(items) => items.iter().find_map(|i| i.resolve(identifier, key)),
            DataNode::Scalar(_) => None,
        }
    }
}

// ============================================================================
// DataSource
// ============================================================================

/// Read-only product data document.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    root: DataNode,
}

impl DataSource {
    pub fn new(root: DataNode) -> Self {
        Self { root }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Json = serde_json::from_str(json)?;
        Ok(Self::new(value.into()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let value: Json = serde_json::from_reader(reader)?;
        tracing::info!(path = %path.display(), "product data loaded");
        Ok(Self::new(value.into()))
    }

    pub fn resolve(&self, identifier: &str, key: &str) -> Option<&DataNode> {
        self.root.resolve(identifier, key)
    }

    /// `"value"` of the entry with this GUID.
    pub fn value(&self, identifier: &str) -> Option<&DataNode> {
        self.resolve(identifier, VALUE_KEY)
    }

    /// `"values"` bundle of the entry with this GUID.
    pub fn values(&self, identifier: &str) -> Option<&DataNode> {
        self.resolve(identifier, VALUES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(value: Json) -> DataSource {
        DataSource::new(value.into())
    }

    #[test]
    fn test_resolve_nested() {
        let data = source(json!({
            "product": {
                "identity": [ { "guid": "g-name", "value": "Concrete" } ],
                "mass": { "guid": "g-mass", "value": 12.5 }
            }
        }));
        assert_eq!(data.value("g-name").and_then(|n| n.as_str()), Some("Concrete"));
        assert_eq!(data.value("g-mass").and_then(|n| n.raw_text()), Some("12.5".into()));
        assert!(data.value("g-none").is_none());
    }

    #[test]
    fn test_resolve_first_match_wins() {
        let data = source(json!([
            { "guid": "g", "value": "first" },
            { "guid": "g", "value": "second" }
        ]));
        assert_eq!(data.value("g").and_then(|n| n.as_str()), Some("first"));
    }

    #[test]
    fn test_entries_before_guid_searched_first() {
        let data = source(json!({
            "children": [ { "guid": "g", "value": "inner" } ],
            "guid": "g",
            "value": "outer"
        }));
        assert_eq!(data.value("g").and_then(|n| n.as_str()), Some("inner"));
    }

    #[test]
    fn test_match_does_not_deepen() {
        let data = source(json!({
            "guid": "g",
            "value": "outer",
            "nested": { "guid": "g", "value": "inner" }
        }));
        assert_eq!(data.value("g").and_then(|n| n.as_str()), Some("outer"));
    }

    #[test]
    fn test_null_value_keeps_searching() {
        let data = source(json!([
            { "guid": "g", "value": null },
            { "guid": "g", "value": "later" }
        ]));
        assert_eq!(data.value("g").and_then(|n| n.as_str()), Some("later"));
    }

    #[test]
    fn test_values_bundle() {
        let data = source(json!({
            "rows": [ { "guid": "row", "values": [ { "guid": "A1", "value": 5 } ] } ]
        }));
        let bundle = data.values("row").unwrap();
        assert_eq!(bundle.resolve("A1", VALUE_KEY).and_then(|n| n.raw_text()), Some("5".into()));
    }

    #[test]
    fn test_truthiness_and_raw_text() {
        assert!(!DataNode::from(json!(0)).is_truthy());
        assert!(!DataNode::from(json!("")).is_truthy());
        assert!(!DataNode::from(json!(false)).is_truthy());
        assert!(!DataNode::from(json!([])).is_truthy());
        assert_eq!(DataNode::from(json!(0)).raw_text(), None);
        assert_eq!(DataNode::from(json!(true)).raw_text(), Some("true".into()));
        assert_eq!(DataNode::from(json!(["A1", "A2"])).raw_text(), Some("A1;A2".into()));
    }

    #[test]
    fn test_from_json_str() {
        let data = DataSource::from_json_str(r#"{"guid": "g", "value": "x"}"#).unwrap();
        assert!(data.value("g").is_some());
        assert!(DataSource::from_json_str("{not json").is_err());
    }
}
