//! Tree component: store, view synchronizer and event surface.

use std::collections::HashSet;

use serde_json::Value;

use crate::events::ClickEvent;

use super::config::{LoadFn, TreeConfig, TreeConfigPatch, TreeFilter, TreeKeys, ValueMode};
use super::error::TreeError;
use super::events::{ClickMarks, StoreEvent, TreeEvent, TreeEventContext};
use super::load::LoadStatus;
use super::model::TreeNodeModel;
use super::node::NodeStatePatch;
use super::store::{InsertItem, TreeStore};
use super::value::NodeValue;
use super::view::{ViewChange, ViewFactory, ViewSync};

/// Construction-time properties of a [`Tree`].
#[derive(Debug, Clone, Default)]
pub struct TreeProps {
    pub config: TreeConfig,
    /// Raw root items.
    pub data: Vec<Value>,
    /// Initially checked values.
    pub value: Vec<NodeValue>,
    /// Initially expanded values.
    pub expanded: Vec<NodeValue>,
    /// Initially actived values.
    pub actived: Vec<NodeValue>,
    /// Clicking a row toggles its expansion.
    pub expand_on_click_node: bool,
}

impl TreeProps {
    pub fn new(data: Vec<Value>) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn value<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        self.value = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn expanded<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        self.expanded = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn actived<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        self.actived = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn expand_on_click_node(mut self, enabled: bool) -> Self {
        self.expand_on_click_node = enabled;
        self
    }
}

/// A tree view component.
///
/// Owns the [`TreeStore`] and the rendered rows. Every mutating method
/// refreshes the rows before returning; the resulting edits are collected
/// for the host via [`Tree::take_view_changes`] and events via
/// [`Tree::take_events`].
pub struct Tree<H, F: ViewFactory<H>> {
    store: TreeStore,
    views: ViewSync<H>,
    factory: F,
    expand_on_click_node: bool,
    /// Click currently being handled, attached to expand/active events.
    click: Option<ClickEvent>,
    updated: HashSet<NodeValue>,
    events: Vec<TreeEvent>,
    changes: Vec<ViewChange>,
}

impl<H, F: ViewFactory<H>> std::fmt::Debug for Tree<H, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("nodes", &self.store.len())
            .field("views", &self.views.len())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<H, F: ViewFactory<H>> Tree<H, F> {
    /// Build the store from `props`, apply initial state and render.
    pub fn new(props: TreeProps, factory: F) -> Result<Self, TreeError> {
        let TreeProps {
            config,
            data,
            value,
            expanded,
            actived,
            expand_on_click_node,
        } = props;
        let expand_parent = config.expand_parent;

        let mut store = TreeStore::new(config);
        store.batch(|store| -> Result<(), TreeError> {
            store.append(data)?;
            if !value.is_empty() {
                store.set_checked(value);
            }
            if !expanded.is_empty() {
                let mut list: Vec<NodeValue> = Vec::new();
                for value in expanded {
                    if expand_parent {
                        for parent in store.get_parents(&value) {
                            if !list.contains(parent.value()) {
                                list.push(parent.value().clone());
                            }
                        }
                    }
                    if !list.contains(&value) {
                        list.push(value);
                    }
                }
                store.set_expanded(list);
            }
            if !actived.is_empty() {
                store.set_actived(actived);
            }
            Ok(())
        })?;

        let mut tree = Self {
            store,
            views: ViewSync::new(),
            factory,
            expand_on_click_node,
            click: None,
            updated: HashSet::new(),
            events: Vec::new(),
            changes: Vec::new(),
        };
        tree.store.update_all();
        tree.refresh();
        Ok(tree)
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn views(&self) -> &ViewSync<H> {
        &self.views
    }

    /// True when no row is rendered; the host shows its empty state.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_view_changes(&mut self) -> Vec<ViewChange> {
        std::mem::take(&mut self.changes)
    }

    /// Drain store notifications and resync the rendered rows.
    pub fn refresh(&mut self) {
        for event in self.store.take_events() {
            match event {
                StoreEvent::Update { updated } => self.updated.extend(updated),
                StoreEvent::Load { node } => self.events.push(TreeEvent::Load {
                    ctx: TreeEventContext { node, event: None },
                }),
            }
        }
        let changes = self
            .views
            .sync(&self.store, &self.updated, &mut self.factory);
        self.updated.clear();
        self.changes.extend(changes);
    }

    fn context(&self, value: &NodeValue) -> Option<TreeEventContext> {
        self.store.get_node(value).map(|node| TreeEventContext {
            node: node.model(),
            event: self.click,
        })
    }

    // -------------------------------------------------------------------------
    // State toggles
    // -------------------------------------------------------------------------

    pub fn set_checked(&mut self, value: &NodeValue, checked: bool) -> Vec<NodeValue> {
        let result = self.store.set_node_checked(value, checked);
        if let Some(ctx) = self.context(value) {
            self.events.push(TreeEvent::Change {
                checked: result.clone(),
                ctx,
            });
        }
        self.refresh();
        result
    }

    pub fn set_expanded(&mut self, value: &NodeValue, expanded: bool) -> Vec<NodeValue> {
        let result = self.store.set_node_expanded(value, expanded);
        if let Some(ctx) = self.context(value) {
            self.events.push(TreeEvent::Expand {
                expanded: result.clone(),
                ctx,
            });
        }
        self.refresh();
        result
    }

    pub fn set_actived(&mut self, value: &NodeValue, actived: bool) -> Vec<NodeValue> {
        let result = self.store.set_node_actived(value, actived);
        if let Some(ctx) = self.context(value) {
            self.events.push(TreeEvent::Active {
                actived: result.clone(),
                ctx,
            });
        }
        self.refresh();
        result
    }

    pub fn toggle_checked(&mut self, value: &NodeValue) -> Vec<NodeValue> {
        let checked = self.store.get_node(value).is_some_and(|n| n.is_checked());
        self.set_checked(value, !checked)
    }

    pub fn toggle_expanded(&mut self, value: &NodeValue) -> Vec<NodeValue> {
        let expanded = self.store.get_node(value).is_some_and(|n| n.is_expanded());
        self.set_expanded(value, !expanded)
    }

    pub fn toggle_actived(&mut self, value: &NodeValue) -> Vec<NodeValue> {
        let actived = self.store.get_node(value).is_some_and(|n| n.is_actived());
        self.set_actived(value, !actived)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Handle a click on the row of `value`.
    ///
    /// Ignored when the tree or the node is disabled.
    pub fn handle_click(&mut self, value: &NodeValue, event: Option<ClickEvent>, marks: &ClickMarks) {
        match self.store.get_node(value) {
            Some(node) if !node.is_disabled() => {}
            _ => return,
        }
        self.click = event;

        let (expand, active) = marks.resolve(self.expand_on_click_node);
        if expand {
            self.toggle_expanded(value);
        }
        if active {
            self.toggle_actived(value);
        }
        if let Some(ctx) = self.context(value) {
            self.events.push(TreeEvent::Click { ctx });
        }
        self.click = None;
    }

    /// Handle the row checkbox of `value` being toggled.
    pub fn handle_change(&mut self, value: &NodeValue) {
        match self.store.get_node(value) {
            Some(node) if !node.is_disabled() => {
                self.toggle_checked(value);
            }
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Public operations
    // -------------------------------------------------------------------------

    /// Update a node: `expanded`, `actived` and `checked` go through the
    /// event-emitting setters, the rest is merged into the node.
    pub fn set_item(&mut self, value: &NodeValue, mut patch: NodeStatePatch) {
        if !self.store.contains(value) {
            return;
        }
        if let Some(expanded) = patch.expanded.take() {
            self.set_expanded(value, expanded);
        }
        if let Some(actived) = patch.actived.take() {
            self.set_actived(value, actived);
        }
        if let Some(checked) = patch.checked.take() {
            self.set_checked(value, checked);
        }
        self.store.set_node_state(value, patch);
        self.refresh();
    }

    pub fn get_item(&self, value: &NodeValue) -> Option<TreeNodeModel> {
        self.store.get_node(value).map(|node| node.model())
    }

    /// Children of `parent`, or every node when `None`.
    pub fn get_items(&self, parent: Option<&NodeValue>) -> Vec<TreeNodeModel> {
        self.store
            .get_nodes(parent)
            .iter()
            .map(|node| node.model())
            .collect()
    }

    /// Resolve raw data that names an existing node into a move.
    fn insert_item(&self, item: Value) -> InsertItem {
        let existing = item
            .get(&self.store.config().keys.value)
            .and_then(NodeValue::from_json)
            .filter(|value| self.store.contains(value));
        match existing {
            Some(value) => InsertItem::Node(value),
            None => InsertItem::Data(item),
        }
    }

    /// Append items under `parent` (root level when `None`).
    ///
    /// Items whose value names an existing node move that node instead.
    pub fn append_to(
        &mut self,
        parent: Option<&NodeValue>,
        items: impl IntoIterator<Item = Value>,
    ) -> Result<(), TreeError> {
        let items: Vec<InsertItem> = items.into_iter().map(|item| self.insert_item(item)).collect();
        let result = self.store.batch(|store| -> Result<(), TreeError> {
            for item in items {
                store.append_nodes(parent, item)?;
            }
            Ok(())
        });
        self.refresh();
        result
    }

    pub fn insert_before(&mut self, value: &NodeValue, item: Value) -> Result<(), TreeError> {
        let item = self.insert_item(item);
        let result = self.store.insert_before(value, item);
        self.refresh();
        result
    }

    pub fn insert_after(&mut self, value: &NodeValue, item: Value) -> Result<(), TreeError> {
        let item = self.insert_item(item);
        let result = self.store.insert_after(value, item);
        self.refresh();
        result
    }

    /// Remove `value` and its subtree, or every node when `None`.
    pub fn remove(&mut self, value: Option<&NodeValue>) {
        match value {
            Some(value) => self.store.remove(value),
            None => self.store.remove_all(),
        }
        self.refresh();
    }

    /// Position of `value` among the rendered rows.
    pub fn get_index(&self, value: &NodeValue) -> Option<usize> {
        self.store.get_node_index(value)
    }

    pub fn get_parent(&self, value: &NodeValue) -> Option<TreeNodeModel> {
        self.store.get_parent(value).map(|node| node.model())
    }

    pub fn get_parents(&self, value: &NodeValue) -> Vec<TreeNodeModel> {
        self.store
            .get_parents(value)
            .iter()
            .map(|node| node.model())
            .collect()
    }

    pub fn get_path(&self, value: &NodeValue) -> Vec<TreeNodeModel> {
        self.store
            .get_node(value)
            .map(|node| node.path().iter().map(|n| n.model()).collect())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Lazy loading
    // -------------------------------------------------------------------------

    /// Wait for the next lazy load, apply it and refresh.
    pub async fn next_load(&mut self) -> Option<LoadStatus> {
        let status = self.store.next_load().await;
        self.refresh();
        status
    }

    /// Apply every finished lazy load and refresh.
    pub fn apply_loads(&mut self) -> Vec<LoadStatus> {
        let statuses = self.store.apply_loads();
        self.refresh();
        statuses
    }

    // -------------------------------------------------------------------------
    // Property updates
    // -------------------------------------------------------------------------

    fn reconfigure(&mut self, patch: TreeConfigPatch) {
        self.store.set_config(patch);
        self.refresh();
    }

    /// Replace the data set.
    pub fn set_data(&mut self, data: Vec<Value>) -> Result<(), TreeError> {
        let result = self.store.reload(data);
        self.refresh();
        result
    }

    /// Replace the checked values.
    pub fn set_value<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        self.store.set_checked(values);
        self.refresh();
    }

    pub fn set_expanded_values<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        self.store.set_expanded(values);
        self.refresh();
    }

    pub fn set_actived_values<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        self.store.set_actived(values);
        self.refresh();
    }

    pub fn set_keys(&mut self, keys: TreeKeys) {
        self.reconfigure(TreeConfigPatch {
            keys: Some(keys),
            ..Default::default()
        });
    }

    pub fn set_expand_all(&mut self, expand_all: bool) {
        self.reconfigure(TreeConfigPatch {
            expand_all: Some(expand_all),
            ..Default::default()
        });
    }

    pub fn set_expand_level(&mut self, level: usize) {
        self.reconfigure(TreeConfigPatch {
            expand_level: Some(level),
            ..Default::default()
        });
    }

    pub fn set_expand_mutex(&mut self, expand_mutex: bool) {
        self.reconfigure(TreeConfigPatch {
            expand_mutex: Some(expand_mutex),
            ..Default::default()
        });
    }

    pub fn set_expand_parent(&mut self, expand_parent: bool) {
        self.reconfigure(TreeConfigPatch {
            expand_parent: Some(expand_parent),
            ..Default::default()
        });
    }

    pub fn set_activable(&mut self, activable: bool) {
        self.reconfigure(TreeConfigPatch {
            activable: Some(activable),
            ..Default::default()
        });
    }

    pub fn set_active_multiple(&mut self, active_multiple: bool) {
        self.reconfigure(TreeConfigPatch {
            active_multiple: Some(active_multiple),
            ..Default::default()
        });
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.reconfigure(TreeConfigPatch {
            disabled: Some(disabled),
            ..Default::default()
        });
    }

    pub fn set_checkable(&mut self, checkable: bool) {
        self.reconfigure(TreeConfigPatch {
            checkable: Some(checkable),
            ..Default::default()
        });
    }

    pub fn set_check_strictly(&mut self, check_strictly: bool) {
        self.reconfigure(TreeConfigPatch {
            check_strictly: Some(check_strictly),
            ..Default::default()
        });
    }

    pub fn set_load(&mut self, load: Option<LoadFn>) {
        self.reconfigure(TreeConfigPatch {
            load: Some(load),
            ..Default::default()
        });
    }

    pub fn set_lazy(&mut self, lazy: bool) {
        self.reconfigure(TreeConfigPatch {
            lazy: Some(lazy),
            ..Default::default()
        });
    }

    pub fn set_value_mode(&mut self, mode: ValueMode) {
        self.reconfigure(TreeConfigPatch {
            value_mode: Some(mode),
            ..Default::default()
        });
    }

    pub fn set_filter(&mut self, filter: Option<TreeFilter>) {
        self.reconfigure(TreeConfigPatch {
            filter: Some(filter),
            ..Default::default()
        });
    }

    pub fn set_expand_on_click_node(&mut self, enabled: bool) {
        self.expand_on_click_node = enabled;
    }
}
