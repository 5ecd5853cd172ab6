//! Tree store: node ownership, structure and change notification.
//!
//! The store owns every node in a generational arena and keeps a value index
//! next to it. Nodes refer to their parent and children by arena key only,
//! so removing a subtree never leaves a dangling owner.
//!
//! Every public mutation runs inside a batch. When the outermost batch ends
//! the store flushes: it recomputes visibility if anything structural
//! changed and queues exactly one [`StoreEvent::Update`].

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use serde_json::{Map, Value};
use slotmap::SlotMap;

use super::config::TreeConfig;
use super::error::TreeError;
use super::events::StoreEvent;
use super::load::LoadChannel;
use super::node::{NodeKey, NodeRef, TreeNode};
use super::value::NodeValue;

/// Item accepted by the structural insert operations.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertItem {
    /// Raw item data, ingested as a new node (with nested children).
    Data(Value),
    /// An existing node, moved together with its subtree.
    Node(NodeValue),
}

impl From<Value> for InsertItem {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<NodeValue> for InsertItem {
    fn from(value: NodeValue) -> Self {
        Self::Node(value)
    }
}

/// Where a node lands among its new siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    End,
    Before(NodeKey),
    After(NodeKey),
}

/// Raw item normalized through the configured [`TreeKeys`](super::TreeKeys).
#[derive(Debug)]
struct RawNode {
    value: NodeValue,
    label: String,
    data: Map<String, Value>,
    children: RawChildren,
    expanded: bool,
    checked: bool,
    actived: bool,
    disabled: bool,
}

#[derive(Debug)]
enum RawChildren {
    None,
    Lazy,
    Items(Vec<RawNode>),
}

/// Nodes of one ingested item that need follow-up after they are linked.
#[derive(Debug, Default)]
struct Ingest {
    actived: Vec<NodeKey>,
    lazy: Vec<NodeKey>,
}

/// Hierarchical node collection with cascading state.
#[derive(Debug)]
pub struct TreeStore {
    pub(crate) config: TreeConfig,
    pub(crate) arena: SlotMap<NodeKey, TreeNode>,
    index: HashMap<NodeValue, NodeKey>,
    roots: Vec<NodeKey>,
    batch_depth: usize,
    dirty: bool,
    needs_reflow: bool,
    updated: Vec<NodeValue>,
    updated_set: HashSet<NodeValue>,
    events: VecDeque<StoreEvent>,
    pub(crate) loads: LoadChannel,
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new(TreeConfig::default())
    }
}

impl TreeStore {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            arena: SlotMap::with_key(),
            index: HashMap::new(),
            roots: Vec::new(),
            batch_depth: 0,
            dirty: false,
            needs_reflow: false,
            updated: Vec::new(),
            updated_set: HashSet::new(),
            events: VecDeque::new(),
            loads: LoadChannel::new(),
        }
    }

    /// Create a store and ingest initial data.
    pub fn with_data(
        config: TreeConfig,
        list: impl IntoIterator<Item = Value>,
    ) -> Result<Self, TreeError> {
        let mut store = Self::new(config);
        store.append(list)?;
        Ok(store)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Batching and notification
    // -------------------------------------------------------------------------

    /// Run `f` as one batch; notifications are coalesced into a single flush.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.flush();
        }
        result
    }

    /// Reflow if needed and queue one update notification.
    ///
    /// Does nothing inside a batch or when nothing changed.
    pub fn flush(&mut self) {
        if self.batch_depth > 0 || !self.dirty {
            return;
        }
        if self.needs_reflow {
            self.reflow();
        }
        self.dirty = false;
        self.updated_set.clear();
        let updated = std::mem::take(&mut self.updated);
        debug!("TreeStore: flush ({} nodes updated)", updated.len());
        if let Some(hook) = &self.config.on_update {
            hook.call(&updated);
        }
        self.events.push_back(StoreEvent::Update { updated });
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain(..).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn push_event(&mut self, event: StoreEvent) {
        self.events.push_back(event);
    }

    /// Record that a node's state changed in the current batch.
    pub(crate) fn touch(&mut self, key: NodeKey) {
        if let Some(node) = self.arena.get(key) {
            let value = node.value.clone();
            self.touch_value(value);
        }
    }

    fn touch_value(&mut self, value: NodeValue) {
        self.dirty = true;
        if self.updated_set.insert(value.clone()) {
            self.updated.push(value);
        }
    }

    /// Mark that structure or expansion changed and visibility must be recomputed.
    pub(crate) fn mark_reflow(&mut self) {
        self.dirty = true;
        self.needs_reflow = true;
    }

    /// Recompute every node's `visible` flag and notify.
    pub fn update_all(&mut self) {
        self.batch(|store| store.mark_reflow());
    }

    /// A node is visible iff all its ancestors are expanded and it passes the filter.
    fn reflow(&mut self) {
        self.needs_reflow = false;
        let mut stack: Vec<(NodeKey, bool)> =
            self.roots.iter().rev().map(|key| (*key, true)).collect();
        let mut results = Vec::with_capacity(self.arena.len());
        while let Some((key, ancestors_expanded)) = stack.pop() {
            let Some(node) = self.arena.get(key) else {
                continue;
            };
            let passes = match (&self.config.filter, ancestors_expanded) {
                (Some(filter), true) => NodeRef::new(self, key)
                    .map(|node| filter.matches(&node.model()))
                    .unwrap_or(false),
                _ => true,
            };
            results.push((key, ancestors_expanded && passes));
            let children_expanded = ancestors_expanded && node.expanded;
            for child in node.children.iter().rev() {
                stack.push((*child, children_expanded));
            }
        }
        for (key, visible) in results {
            let changed = match self.arena.get_mut(key) {
                Some(node) if node.visible != visible => {
                    node.visible = visible;
                    true
                }
                _ => false,
            };
            if changed {
                self.touch(key);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, value: &NodeValue) -> bool {
        self.index.contains_key(value)
    }

    pub fn key_of(&self, value: &NodeValue) -> Option<NodeKey> {
        self.index.get(value).copied()
    }

    pub fn get_node(&self, value: &NodeValue) -> Option<NodeRef<'_>> {
        self.key_of(value).and_then(|key| NodeRef::new(self, key))
    }

    pub fn node_by_key(&self, key: NodeKey) -> Option<NodeRef<'_>> {
        NodeRef::new(self, key)
    }

    pub fn roots(&self) -> Vec<NodeRef<'_>> {
        self.roots
            .iter()
            .filter_map(|key| NodeRef::new(self, *key))
            .collect()
    }

    /// Children of `parent`, or every node in depth-first order when `None`.
    ///
    /// An unknown parent yields an empty list.
    pub fn get_nodes(&self, parent: Option<&NodeValue>) -> Vec<NodeRef<'_>> {
        match parent {
            Some(value) => self
                .get_node(value)
                .map(|node| node.children())
                .unwrap_or_default(),
            None => self
                .walk()
                .into_iter()
                .filter_map(|key| NodeRef::new(self, key))
                .collect(),
        }
    }

    pub fn get_parent(&self, value: &NodeValue) -> Option<NodeRef<'_>> {
        self.get_node(value).and_then(|node| node.parent())
    }

    /// Ancestor chain of `value`, root first.
    pub fn get_parents(&self, value: &NodeValue) -> Vec<NodeRef<'_>> {
        self.get_node(value)
            .map(|node| node.parents())
            .unwrap_or_default()
    }

    /// Position of `value` within the current visible list.
    pub fn get_node_index(&self, value: &NodeValue) -> Option<usize> {
        let key = self.key_of(value)?;
        self.visible_keys().iter().position(|k| *k == key)
    }

    /// Depth-first, insertion-order list of visible nodes.
    pub fn visible_nodes(&self) -> Vec<NodeRef<'_>> {
        self.visible_keys()
            .into_iter()
            .filter_map(|key| NodeRef::new(self, key))
            .collect()
    }

    pub fn visible_values(&self) -> Vec<NodeValue> {
        self.visible_keys()
            .into_iter()
            .filter_map(|key| self.arena.get(key).map(|n| n.value.clone()))
            .collect()
    }

    fn visible_keys(&self) -> Vec<NodeKey> {
        self.walk()
            .into_iter()
            .filter(|key| self.arena.get(*key).is_some_and(|n| n.visible))
            .collect()
    }

    /// Depth-first order of all nodes.
    pub(crate) fn walk(&self) -> Vec<NodeKey> {
        let mut order = Vec::with_capacity(self.arena.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            if let Some(node) = self.arena.get(key) {
                order.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Depth-first order of `key` and its descendants.
    pub(crate) fn walk_from(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut order = Vec::new();
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.arena.get(key) {
                order.push(key);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Keys sharing `key`'s parent, including `key` itself.
    pub(crate) fn sibling_keys(&self, key: NodeKey) -> &[NodeKey] {
        match self.arena.get(key).and_then(|n| n.parent) {
            Some(parent) => self
                .arena
                .get(parent)
                .map(|p| p.children.as_slice())
                .unwrap_or(&[]),
            None => &self.roots,
        }
    }

    pub(crate) fn is_disabled_key(&self, key: NodeKey) -> bool {
        self.config.disabled || self.arena.get(key).is_some_and(|n| n.disabled)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, mut key: NodeKey) -> bool {
        loop {
            if key == ancestor {
                return true;
            }
            match self.arena.get(key).and_then(|n| n.parent) {
                Some(parent) => key = parent,
                None => return false,
            }
        }
    }

    // -------------------------------------------------------------------------
    // Structural mutation
    // -------------------------------------------------------------------------

    /// Append raw items at the root level.
    pub fn append(&mut self, list: impl IntoIterator<Item = Value>) -> Result<(), TreeError> {
        self.append_to(None, list)
    }

    /// Append raw items under `parent` (root level when `None`).
    ///
    /// Each item is inserted atomically. The batch is not: the first failing
    /// item stops it and earlier items stay inserted. An unknown parent is a
    /// no-op.
    pub fn append_to(
        &mut self,
        parent: Option<&NodeValue>,
        list: impl IntoIterator<Item = Value>,
    ) -> Result<(), TreeError> {
        self.batch(|store| -> Result<(), TreeError> {
            let parent_key = match parent {
                Some(value) => match store.key_of(value) {
                    Some(key) => Some(key),
                    None => {
                        debug!("TreeStore: append_to unknown parent '{}' ignored", value);
                        return Ok(());
                    }
                },
                None => None,
            };
            for item in list {
                store.insert_item(&item, parent_key, Anchor::End)?;
            }
            Ok(())
        })
    }

    /// Append an item (raw data or an existing node) as the last child of `parent`.
    pub fn append_nodes(
        &mut self,
        parent: Option<&NodeValue>,
        item: impl Into<InsertItem>,
    ) -> Result<(), TreeError> {
        let item = item.into();
        self.batch(|store| {
            let parent_key = match parent {
                Some(value) => match store.key_of(value) {
                    Some(key) => Some(key),
                    None => {
                        debug!("TreeStore: append_nodes unknown parent '{}' ignored", value);
                        return Ok(());
                    }
                },
                None => None,
            };
            store.place(item, parent_key, Anchor::End)
        })
    }

    /// Insert an item as the previous sibling of `reference`.
    pub fn insert_before(
        &mut self,
        reference: &NodeValue,
        item: impl Into<InsertItem>,
    ) -> Result<(), TreeError> {
        let item = item.into();
        self.batch(|store| {
            let Some(key) = store.key_of(reference) else {
                debug!("TreeStore: insert_before unknown node '{}' ignored", reference);
                return Ok(());
            };
            let parent = store.arena.get(key).and_then(|n| n.parent);
            store.place(item, parent, Anchor::Before(key))
        })
    }

    /// Insert an item as the next sibling of `reference`.
    pub fn insert_after(
        &mut self,
        reference: &NodeValue,
        item: impl Into<InsertItem>,
    ) -> Result<(), TreeError> {
        let item = item.into();
        self.batch(|store| {
            let Some(key) = store.key_of(reference) else {
                debug!("TreeStore: insert_after unknown node '{}' ignored", reference);
                return Ok(());
            };
            let parent = store.arena.get(key).and_then(|n| n.parent);
            store.place(item, parent, Anchor::After(key))
        })
    }

    fn place(
        &mut self,
        item: InsertItem,
        parent: Option<NodeKey>,
        anchor: Anchor,
    ) -> Result<(), TreeError> {
        match item {
            InsertItem::Data(data) => self.insert_item(&data, parent, anchor).map(|_| ()),
            InsertItem::Node(value) => match self.key_of(&value) {
                Some(key) => self.move_node(key, parent, anchor),
                None => {
                    debug!("TreeStore: move of unknown node '{}' ignored", value);
                    Ok(())
                }
            },
        }
    }

    /// Remove a node and its subtree. Unknown values are ignored.
    pub fn remove(&mut self, value: &NodeValue) {
        self.batch(|store| {
            let Some(key) = store.key_of(value) else {
                debug!("TreeStore: remove unknown node '{}' ignored", value);
                return;
            };
            let parent = store.arena.get(key).and_then(|n| n.parent);
            store.detach(key);
            for key in store.walk_from(key) {
                if let Some(node) = store.arena.remove(key) {
                    store.index.remove(&node.value);
                    store.touch_value(node.value);
                }
            }
            store.refresh_ancestors_from(parent);
            store.mark_reflow();
        });
    }

    pub fn remove_all(&mut self) {
        self.batch(|store| {
            let values: Vec<NodeValue> = store.index.keys().cloned().collect();
            store.arena.clear();
            store.index.clear();
            store.roots.clear();
            for value in values {
                store.touch_value(value);
            }
            store.mark_reflow();
        });
    }

    /// Replace all nodes with a fresh data set.
    pub fn reload(&mut self, list: impl IntoIterator<Item = Value>) -> Result<(), TreeError> {
        self.batch(|store| {
            store.remove_all();
            store.append(list)
        })
    }

    /// Ingest one raw item and link it under `parent`.
    pub(crate) fn insert_item(
        &mut self,
        item: &Value,
        parent: Option<NodeKey>,
        anchor: Anchor,
    ) -> Result<NodeKey, TreeError> {
        let raw = self.normalize(item)?;
        self.validate(&raw)?;

        let level = parent
            .and_then(|p| self.arena.get(p))
            .map(|n| n.level + 1)
            .unwrap_or(0);
        let inherited = !self.config.check_strictly
            && parent
                .and_then(|p| self.arena.get(p))
                .is_some_and(|n| n.checked);
        let mut ingest = Ingest::default();
        let key = self.build(raw, parent, level, inherited, &mut ingest);
        self.attach(key, parent, anchor);

        if !self.config.check_strictly {
            self.aggregate_subtree(key);
            self.refresh_ancestors_from(parent);
        }
        for key in ingest.actived {
            self.apply_actived(key, true);
        }
        for key in ingest.lazy {
            let expanded = self.arena.get(key).is_some_and(|n| n.expanded);
            if !self.config.lazy || expanded {
                self.start_load(key);
            }
        }
        self.mark_reflow();
        Ok(key)
    }

    fn normalize(&self, item: &Value) -> Result<RawNode, TreeError> {
        let Value::Object(object) = item else {
            return Err(TreeError::InvalidItem(item.to_string()));
        };
        let keys = &self.config.keys;
        let value = object
            .get(&keys.value)
            .and_then(NodeValue::from_json)
            .unwrap_or_else(NodeValue::generate);
        let label = match object.get(&keys.label) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let children = match object.get(&keys.children) {
            Some(Value::Array(items)) => RawChildren::Items(
                items
                    .iter()
                    .map(|child| self.normalize(child))
                    .collect::<Result<_, _>>()?,
            ),
            Some(Value::Bool(true)) => RawChildren::Lazy,
            _ => RawChildren::None,
        };
        let flag = |name: &str| object.get(name).and_then(Value::as_bool).unwrap_or(false);
        let mut data = object.clone();
        data.remove(&keys.children);
        Ok(RawNode {
            value,
            label,
            expanded: flag("expanded"),
            checked: flag("checked"),
            actived: flag("actived"),
            disabled: flag("disabled"),
            data,
            children,
        })
    }

    /// Every value in the item must be new and appear once.
    fn validate(&self, raw: &RawNode) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        let mut stack = vec![raw];
        while let Some(raw) = stack.pop() {
            if self.index.contains_key(&raw.value) || !seen.insert(&raw.value) {
                return Err(TreeError::DuplicateValue(raw.value.clone()));
            }
            if let RawChildren::Items(children) = &raw.children {
                stack.extend(children.iter());
            }
        }
        Ok(())
    }

    fn build(
        &mut self,
        raw: RawNode,
        parent: Option<NodeKey>,
        level: usize,
        inherited_checked: bool,
        ingest: &mut Ingest,
    ) -> NodeKey {
        let RawNode {
            value,
            label,
            data,
            children,
            expanded,
            checked,
            actived,
            disabled,
        } = raw;

        let mut node = TreeNode::new(value.clone(), label, data);
        node.parent = parent;
        node.level = level;
        node.disabled = disabled;
        node.checked = checked || inherited_checked;
        node.expanded =
            expanded || self.config.expand_all || level < self.config.expand_level;
        node.lazy_children = matches!(children, RawChildren::Lazy);
        let is_checked = node.checked;
        let key = self.arena.insert(node);
        self.index.insert(value.clone(), key);
        self.touch_value(value);

        if actived {
            ingest.actived.push(key);
        }
        match children {
            RawChildren::Items(items) => {
                let inherit = is_checked && !self.config.check_strictly;
                let keys: Vec<NodeKey> = items
                    .into_iter()
                    .map(|child| self.build(child, Some(key), level + 1, inherit, ingest))
                    .collect();
                if let Some(node) = self.arena.get_mut(key) {
                    node.children = keys;
                }
            }
            RawChildren::Lazy => ingest.lazy.push(key),
            RawChildren::None => {}
        }
        key
    }

    /// Link `key` into `parent`'s children (or the roots) at `anchor`.
    fn attach(&mut self, key: NodeKey, parent: Option<NodeKey>, anchor: Anchor) {
        let siblings = match parent {
            Some(parent) => match self.arena.get_mut(parent) {
                Some(node) => {
                    node.lazy_children = false;
                    &mut node.children
                }
                None => return,
            },
            None => &mut self.roots,
        };
        let position = match anchor {
            Anchor::End => siblings.len(),
            Anchor::Before(reference) => siblings
                .iter()
                .position(|k| *k == reference)
                .unwrap_or(siblings.len()),
            Anchor::After(reference) => siblings
                .iter()
                .position(|k| *k == reference)
                .map(|i| i + 1)
                .unwrap_or(siblings.len()),
        };
        siblings.insert(position, key);
        if let Some(node) = self.arena.get_mut(key) {
            node.parent = parent;
        }
        if let Some(parent) = parent {
            self.touch(parent);
        }
    }

    /// Unlink `key` from its parent's children (or the roots).
    fn detach(&mut self, key: NodeKey) {
        let parent = self.arena.get(key).and_then(|n| n.parent);
        let siblings = match parent {
            Some(parent) => match self.arena.get_mut(parent) {
                Some(node) => &mut node.children,
                None => return,
            },
            None => &mut self.roots,
        };
        siblings.retain(|k| *k != key);
        if let Some(parent) = parent {
            self.touch(parent);
        }
    }

    fn move_node(
        &mut self,
        key: NodeKey,
        parent: Option<NodeKey>,
        anchor: Anchor,
    ) -> Result<(), TreeError> {
        if let Anchor::Before(reference) | Anchor::After(reference) = anchor {
            if reference == key {
                return Ok(());
            }
        }
        if let Some(parent) = parent {
            if self.is_ancestor_or_self(key, parent) {
                let value = self
                    .arena
                    .get(key)
                    .map(|n| n.value.clone())
                    .unwrap_or_else(NodeValue::generate);
                return Err(TreeError::CyclicMove(value));
            }
        }
        let old_parent = self.arena.get(key).and_then(|n| n.parent);
        self.detach(key);
        self.attach(key, parent, anchor);

        let base = parent
            .and_then(|p| self.arena.get(p))
            .map(|n| n.level + 1)
            .unwrap_or(0);
        let offset = self.arena.get(key).map(|n| n.level).unwrap_or(0);
        for descendant in self.walk_from(key) {
            if let Some(node) = self.arena.get_mut(descendant) {
                node.level = node.level - offset + base;
            }
            self.touch(descendant);
        }

        self.refresh_ancestors_from(old_parent);
        self.refresh_ancestors_from(parent);
        self.mark_reflow();
        Ok(())
    }
}
