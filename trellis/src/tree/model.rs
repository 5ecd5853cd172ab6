//! Immutable node snapshots handed to external code.

use serde::Serialize;
use serde_json::Value;

use super::value::NodeValue;

/// Snapshot of a node's identity, payload and state.
///
/// Event contexts, filters and load functions only ever see this type, never
/// the live node, so cascade invariants cannot be bypassed from outside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNodeModel {
    pub value: NodeValue,
    pub label: String,
    /// Raw item fields, without the children field.
    pub data: Value,
    /// Number of ancestors (0 for roots).
    pub level: usize,
    /// Position among siblings.
    pub index: usize,
    pub parent: Option<NodeValue>,
    pub children: Vec<NodeValue>,
    pub checked: bool,
    pub indeterminate: bool,
    pub expanded: bool,
    pub actived: bool,
    pub disabled: bool,
    pub loading: bool,
    pub visible: bool,
    pub is_leaf: bool,
    pub is_first: bool,
    pub is_last: bool,
}

impl TreeNodeModel {
    /// Read a raw data field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}
