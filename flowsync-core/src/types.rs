//! Domain types for the flow document and manifest.
//!
//! Records are typed only on the fields the collector owns; everything else a
//! record carries is captured in a flattened map and written back verbatim,
//! so a rewrite never loses runtime configuration.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for a record in the flow document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(pub String);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for FlowId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FlowId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Flow document
// ---------------------------------------------------------------------------

/// One record of the flow document.
///
/// The collector reads and writes the five template-backed fields; `rest`
/// holds every other attribute of the record untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: FlowId,

    /// The record's declared type (`"function"`, `"typescript"`, …).
    #[serde(rename = "type")]
    pub kind: String,

    /// Primary executable body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,

    /// Startup hook body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialize: Option<String>,

    /// Teardown hook body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalize: Option<String>,

    /// Free-form documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    /// Editable display source (display-type records only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The flow document: an ordered sequence of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowDocument(pub Vec<FlowNode>);

impl FlowDocument {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowNode> {
        self.0.iter()
    }

    /// First record with the given id, regardless of its fields.
    pub fn find(&self, id: &FlowId) -> Option<&FlowNode> {
        self.0.iter().find(|node| &node.id == id)
    }

    pub fn find_mut(&mut self, id: &FlowId) -> Option<&mut FlowNode> {
        self.0.iter_mut().find(|node| &node.id == id)
    }

    /// First record with the given id that carries a `func` field.
    pub fn find_func_mut(&mut self, id: &FlowId) -> Option<&mut FlowNode> {
        self.0
            .iter_mut()
            .find(|node| &node.id == id && node.func.is_some())
    }

    /// First record with the given id that carries a `format` field.
    pub fn find_format_mut(&mut self, id: &FlowId) -> Option<&mut FlowNode> {
        self.0
            .iter_mut()
            .find(|node| &node.id == id && node.format.is_some())
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Manifest metadata for a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Base file name the record's templates are exported under.
    #[serde(rename = "fileName")]
    pub file_name: String,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The manifest: record id → entry metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest(pub BTreeMap<String, ManifestEntry>);

impl Manifest {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the inverted base-name index once for the whole run.
    ///
    /// The manifest is expected to keep file names unique; if it does not,
    /// the first entry in map order wins.
    pub fn name_index(&self) -> NameIndex {
        let mut map = HashMap::new();
        for (id, entry) in &self.0 {
            map.entry(entry.file_name.trim().to_owned())
                .or_insert_with(|| FlowId::from(id.as_str()));
        }
        NameIndex { map }
    }
}

/// Inverted lookup from a normalized template base name to a record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex {
    map: HashMap<String, FlowId>,
}

impl NameIndex {
    pub fn resolve(&self, base_name: &str) -> Option<&FlowId> {
        self.map.get(base_name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(file_name: &str) -> ManifestEntry {
        ManifestEntry {
            file_name: file_name.to_string(),
            rest: Map::new(),
        }
    }

    #[test]
    fn flow_id_display_and_from() {
        assert_eq!(FlowId::from("n1").to_string(), "n1");
        assert_eq!(FlowId::from(String::from("n2")).0, "n2");
    }

    #[test]
    fn node_roundtrip_preserves_unknown_fields() {
        let raw = r#"{
            "id": "a1",
            "type": "function",
            "func": "return msg;",
            "x": 120,
            "y": 80,
            "wires": [["b2"]]
        }"#;
        let node: FlowNode = serde_json::from_str(raw).expect("deserialize");
        assert_eq!(node.id, FlowId::from("a1"));
        assert_eq!(node.kind, "function");
        assert_eq!(node.func.as_deref(), Some("return msg;"));
        assert_eq!(node.rest.get("x"), Some(&Value::from(120)));

        let back = serde_json::to_value(&node).expect("serialize");
        assert_eq!(back.get("wires"), Some(&serde_json::json!([["b2"]])));
        assert_eq!(back.get("y"), Some(&Value::from(80)));
    }

    #[test]
    fn absent_optional_fields_are_omitted_on_write() {
        let raw = r#"{"id": "a1", "type": "inject"}"#;
        let node: FlowNode = serde_json::from_str(raw).expect("deserialize");
        let back = serde_json::to_value(&node).expect("serialize");
        let object = back.as_object().expect("object");
        assert!(!object.contains_key("func"));
        assert!(!object.contains_key("initialize"));
        assert!(!object.contains_key("format"));
    }

    #[test]
    fn find_func_skips_records_without_func() {
        let doc: FlowDocument = serde_json::from_str(
            r#"[
                {"id": "a1", "type": "tab"},
                {"id": "a1", "type": "function", "func": "x"}
            ]"#,
        )
        .expect("deserialize");
        let mut doc = doc;
        let node = doc.find_func_mut(&FlowId::from("a1")).expect("func record");
        assert_eq!(node.kind, "function");
    }

    #[test]
    fn name_index_resolves_trimmed_names() {
        let mut entries = BTreeMap::new();
        entries.insert("n1".to_string(), entry(" parse-input "));
        let index = Manifest(entries).name_index();
        assert_eq!(index.resolve("parse-input"), Some(&FlowId::from("n1")));
        assert_eq!(index.resolve("missing"), None);
    }

    #[test]
    fn name_index_first_entry_wins_on_duplicates() {
        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), entry("shared"));
        entries.insert("b".to_string(), entry("shared"));
        let index = Manifest(entries).name_index();
        assert_eq!(index.resolve("shared"), Some(&FlowId::from("a")));
        assert_eq!(index.len(), 1);
    }
}
