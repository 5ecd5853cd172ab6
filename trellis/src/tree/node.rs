//! Tree nodes and borrowed node views.

use serde_json::{Map, Value};
use slotmap::new_key_type;

use super::model::TreeNodeModel;
use super::store::TreeStore;
use super::value::NodeValue;

new_key_type! {
    /// Arena key of a node. Stale keys of removed nodes never resolve again.
    pub struct NodeKey;
}

/// A node stored in the tree arena.
///
/// Fields are only mutated by [`TreeStore`] so cascade invariants hold.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) value: NodeValue,
    pub(crate) label: String,
    pub(crate) data: Map<String, Value>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) level: usize,
    pub(crate) checked: bool,
    pub(crate) indeterminate: bool,
    pub(crate) expanded: bool,
    pub(crate) actived: bool,
    pub(crate) visible: bool,
    pub(crate) disabled: bool,
    pub(crate) loading: bool,
    /// Raw `children: true`: children exist but have not been loaded.
    pub(crate) lazy_children: bool,
}

impl TreeNode {
    pub(crate) fn new(value: NodeValue, label: String, data: Map<String, Value>) -> Self {
        Self {
            value,
            label,
            data,
            parent: None,
            children: Vec::new(),
            level: 0,
            checked: false,
            indeterminate: false,
            expanded: false,
            actived: false,
            visible: false,
            disabled: false,
            loading: false,
            lazy_children: false,
        }
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// A leaf has neither loaded nor pending children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && !self.lazy_children
    }
}

/// Borrowed read view of one node inside a store.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    store: &'a TreeStore,
    key: NodeKey,
    node: &'a TreeNode,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", &self.node.value)
            .field("key", &self.key)
            .finish()
    }
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(store: &'a TreeStore, key: NodeKey) -> Option<Self> {
        store.arena.get(key).map(|node| Self { store, key, node })
    }

    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn node(&self) -> &'a TreeNode {
        self.node
    }

    pub fn value(&self) -> &'a NodeValue {
        &self.node.value
    }

    pub fn label(&self) -> &'a str {
        &self.node.label
    }

    pub fn data(&self) -> &'a Map<String, Value> {
        &self.node.data
    }

    pub fn level(&self) -> usize {
        self.node.level
    }

    pub fn is_checked(&self) -> bool {
        self.node.checked
    }

    pub fn is_indeterminate(&self) -> bool {
        self.node.indeterminate
    }

    pub fn is_expanded(&self) -> bool {
        self.node.expanded
    }

    pub fn is_actived(&self) -> bool {
        self.node.actived
    }

    /// Disabled directly or through the tree-wide `disabled` config.
    pub fn is_disabled(&self) -> bool {
        self.store.config.disabled || self.node.disabled
    }

    pub fn is_visible(&self) -> bool {
        self.node.visible
    }

    pub fn is_loading(&self) -> bool {
        self.node.loading
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|key| NodeRef::new(self.store, key))
    }

    /// Ancestor chain, root first.
    pub fn parents(&self) -> Vec<NodeRef<'a>> {
        let mut parents = Vec::new();
        let mut current = self.parent();
        while let Some(parent) = current {
            current = parent.parent();
            parents.push(parent);
        }
        parents.reverse();
        parents
    }

    /// Root-to-self chain, inclusive.
    pub fn path(&self) -> Vec<NodeRef<'a>> {
        let mut path = self.parents();
        path.push(*self);
        path
    }

    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.node
            .children
            .iter()
            .filter_map(|key| NodeRef::new(self.store, *key))
            .collect()
    }

    /// Other nodes sharing this node's parent (or the root level).
    pub fn siblings(&self) -> Vec<NodeRef<'a>> {
        self.store
            .sibling_keys(self.key)
            .iter()
            .filter(|key| **key != self.key)
            .filter_map(|key| NodeRef::new(self.store, *key))
            .collect()
    }

    /// Position among siblings.
    pub fn index(&self) -> usize {
        self.store
            .sibling_keys(self.key)
            .iter()
            .position(|key| *key == self.key)
            .unwrap_or(0)
    }

    pub fn is_first(&self) -> bool {
        self.index() == 0
    }

    pub fn is_last(&self) -> bool {
        self.index() + 1 >= self.store.sibling_keys(self.key).len()
    }

    /// Immutable snapshot for external consumers.
    pub fn model(&self) -> TreeNodeModel {
        let siblings = self.store.sibling_keys(self.key);
        let index = siblings
            .iter()
            .position(|key| *key == self.key)
            .unwrap_or(0);
        TreeNodeModel {
            value: self.node.value.clone(),
            label: self.node.label.clone(),
            data: Value::Object(self.node.data.clone()),
            level: self.node.level,
            index,
            parent: self.parent().map(|p| p.value().clone()),
            children: self.children().iter().map(|c| c.value().clone()).collect(),
            checked: self.node.checked,
            indeterminate: self.node.indeterminate,
            expanded: self.node.expanded,
            actived: self.node.actived,
            disabled: self.is_disabled(),
            loading: self.node.loading,
            visible: self.node.visible,
            is_leaf: self.node.is_leaf(),
            is_first: index == 0,
            is_last: index + 1 >= siblings.len(),
        }
    }
}

/// Partial node update applied by `TreeStore::set_node_state`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStatePatch {
    pub checked: Option<bool>,
    pub expanded: Option<bool>,
    pub actived: Option<bool>,
    pub disabled: Option<bool>,
    pub label: Option<String>,
    /// Fields merged into the node's raw data.
    pub data: Option<Map<String, Value>>,
}

impl NodeStatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn actived(mut self, actived: bool) -> Self {
        self.actived = Some(actived);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(name.into(), value);
        self
    }
}
