//! # Structure Tree
//!
//! A parallel, introspectable view of the component hierarchy: a rose tree
//! of labelled nodes rebuilt on demand from the live tree. Nothing renders
//! from it, so it is safe to snapshot in tests or dump from the CLI.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureNode {
    /// "document", "page", "row", "footer-row", "col", or a component kind.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructureNode>,
}

impl StructureNode {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            value: None,
            details: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn add_child(&mut self, child: StructureNode) {
        self.children.push(child);
    }

    /// Same subtree under a different label.
    pub fn relabel(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    /// Number of nodes labelled `kind` in this subtree, self included.
    pub fn count(&self, kind: &str) -> usize {
        let own = usize::from(self.kind == kind);
        own + self.children.iter().map(|c| c.count(kind)).sum::<usize>()
    }

    pub fn to_json_pretty(&self) -> String {
        // Keys are strings and values are already JSON, so this cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_walks_the_tree() {
        let mut row = StructureNode::new("row");
        row.add_child(StructureNode::new("col"));
        row.add_child(StructureNode::new("col"));
        let mut page = StructureNode::new("page");
        page.add_child(row.clone());
        page.add_child(row);
        assert_eq!(page.count("col"), 4);
        assert_eq!(page.count("page"), 1);
    }

    #[test]
    fn serializes_kind_as_type_and_skips_empty() {
        let node = StructureNode::new("text").with_value("Hello");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "value": "Hello"}));
    }

    #[test]
    fn details_are_kept_sorted() {
        let node = StructureNode::new("col")
            .with_detail("size", 6)
            .with_detail("is_max", false);
        let keys: Vec<&String> = node.details.keys().collect();
        assert_eq!(keys, vec!["is_max", "size"]);
    }
}
