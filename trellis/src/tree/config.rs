//! Tree configuration types.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use super::error::LoadError;
use super::model::TreeNodeModel;
use super::value::NodeValue;

/// Field names used to read raw item data.
///
/// Resolved once when an item is ingested; nodes never look fields up again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeKeys {
    pub value: String,
    pub label: String,
    pub children: String,
}

impl Default for TreeKeys {
    fn default() -> Self {
        Self {
            value: "value".to_string(),
            label: "label".to_string(),
            children: "children".to_string(),
        }
    }
}

impl TreeKeys {
    pub fn new(
        value: impl Into<String>,
        label: impl Into<String>,
        children: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            children: children.into(),
        }
    }
}

/// Which checked nodes are reported in the checked value set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMode {
    /// Only checked leaf nodes.
    #[default]
    OnlyLeaf,
    /// Checked nodes whose parent is not checked.
    ParentFirst,
    /// Every checked node.
    All,
}

/// Synchronous visibility predicate, evaluated per node on every reflow.
#[derive(Clone)]
pub struct TreeFilter(Arc<dyn Fn(&TreeNodeModel) -> bool + Send + Sync>);

impl TreeFilter {
    pub fn new(f: impl Fn(&TreeNodeModel) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn matches(&self, node: &TreeNodeModel) -> bool {
        (self.0)(node)
    }
}

impl fmt::Debug for TreeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TreeFilter(..)")
    }
}

/// Future returned by a [`LoadFn`].
pub type LoadFuture = BoxFuture<'static, Result<Vec<Value>, LoadError>>;

/// Asynchronous child loader for lazy nodes.
///
/// Receives a snapshot of the node being expanded and resolves to the raw
/// child items to append under it.
#[derive(Clone)]
pub struct LoadFn(Arc<dyn Fn(TreeNodeModel) -> LoadFuture + Send + Sync>);

impl LoadFn {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(TreeNodeModel) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Value>, LoadError>> + Send + 'static,
    {
        Self(Arc::new(move |node| f(node).boxed()))
    }

    pub fn call(&self, node: TreeNodeModel) -> LoadFuture {
        (self.0)(node)
    }
}

impl fmt::Debug for LoadFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadFn(..)")
    }
}

/// Callback invoked once per flush with the values updated in that batch.
#[derive(Clone)]
pub struct UpdateHook(Arc<dyn Fn(&[NodeValue]) + Send + Sync>);

impl UpdateHook {
    pub fn new(f: impl Fn(&[NodeValue]) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, updated: &[NodeValue]) {
        (self.0)(updated)
    }
}

impl fmt::Debug for UpdateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateHook(..)")
    }
}

/// Callback invoked when a lazy load has been applied.
#[derive(Clone)]
pub struct LoadHook(Arc<dyn Fn(&TreeNodeModel) + Send + Sync>);

impl LoadHook {
    pub fn new(f: impl Fn(&TreeNodeModel) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, node: &TreeNodeModel) {
        (self.0)(node)
    }
}

impl fmt::Debug for LoadHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadHook(..)")
    }
}

/// Store configuration.
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Raw data field mapping.
    pub keys: TreeKeys,
    /// Nodes can be actived (highlighted).
    pub activable: bool,
    /// More than one node may be actived at once.
    pub active_multiple: bool,
    /// Nodes can be checked.
    pub checkable: bool,
    /// Parent and child checked state are independent.
    pub check_strictly: bool,
    /// The whole tree is disabled.
    pub disabled: bool,
    /// New nodes start expanded.
    pub expand_all: bool,
    /// New nodes with a level below this start expanded.
    pub expand_level: usize,
    /// At most one expanded node per sibling group.
    pub expand_mutex: bool,
    /// Expanding a node expands its ancestors too.
    pub expand_parent: bool,
    /// Unloaded children load when their node is expanded, not on insertion.
    pub lazy: bool,
    pub load: Option<LoadFn>,
    pub filter: Option<TreeFilter>,
    pub value_mode: ValueMode,
    pub on_update: Option<UpdateHook>,
    pub on_load: Option<LoadHook>,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(mut self, keys: TreeKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn activable(mut self, activable: bool) -> Self {
        self.activable = activable;
        self
    }

    pub fn active_multiple(mut self, active_multiple: bool) -> Self {
        self.active_multiple = active_multiple;
        self
    }

    pub fn checkable(mut self, checkable: bool) -> Self {
        self.checkable = checkable;
        self
    }

    pub fn check_strictly(mut self, check_strictly: bool) -> Self {
        self.check_strictly = check_strictly;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn expand_all(mut self, expand_all: bool) -> Self {
        self.expand_all = expand_all;
        self
    }

    pub fn expand_level(mut self, level: usize) -> Self {
        self.expand_level = level;
        self
    }

    pub fn expand_mutex(mut self, expand_mutex: bool) -> Self {
        self.expand_mutex = expand_mutex;
        self
    }

    pub fn expand_parent(mut self, expand_parent: bool) -> Self {
        self.expand_parent = expand_parent;
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn load(mut self, load: LoadFn) -> Self {
        self.load = Some(load);
        self
    }

    pub fn filter(mut self, filter: TreeFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn value_mode(mut self, mode: ValueMode) -> Self {
        self.value_mode = mode;
        self
    }

    pub fn on_update(mut self, hook: UpdateHook) -> Self {
        self.on_update = Some(hook);
        self
    }

    pub fn on_load(mut self, hook: LoadHook) -> Self {
        self.on_load = Some(hook);
        self
    }
}

/// Partial configuration merged by `TreeStore::set_config`.
///
/// `load` and `filter` use a nested `Option` so they can be cleared.
#[derive(Debug, Clone, Default)]
pub struct TreeConfigPatch {
    pub keys: Option<TreeKeys>,
    pub activable: Option<bool>,
    pub active_multiple: Option<bool>,
    pub checkable: Option<bool>,
    pub check_strictly: Option<bool>,
    pub disabled: Option<bool>,
    pub expand_all: Option<bool>,
    pub expand_level: Option<usize>,
    pub expand_mutex: Option<bool>,
    pub expand_parent: Option<bool>,
    pub lazy: Option<bool>,
    pub load: Option<Option<LoadFn>>,
    pub filter: Option<Option<TreeFilter>>,
    pub value_mode: Option<ValueMode>,
}

impl TreeConfigPatch {
    /// Whether applying this patch can change node visibility.
    pub fn affects_visibility(&self) -> bool {
        self.filter.is_some() || self.disabled.is_some()
    }
}
