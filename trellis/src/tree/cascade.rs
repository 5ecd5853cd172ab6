//! Cascading node state: checked, expanded, actived.

use std::collections::HashSet;

use log::debug;

use super::config::{TreeConfigPatch, ValueMode};
use super::node::{NodeKey, NodeStatePatch};
use super::store::TreeStore;
use super::value::NodeValue;

impl TreeStore {
    // -------------------------------------------------------------------------
    // Checked
    // -------------------------------------------------------------------------

    /// Check or uncheck one node and return the resulting checked set.
    ///
    /// No-op when the tree is not checkable or the node is disabled.
    pub fn set_node_checked(&mut self, value: &NodeValue, checked: bool) -> Vec<NodeValue> {
        self.batch(|store| match store.key_of(value) {
            Some(key) if store.config.checkable && !store.is_disabled_key(key) => {
                store.apply_checked(key, checked);
            }
            Some(_) => debug!("TreeStore: node '{}' is not checkable", value),
            None => debug!("TreeStore: set_node_checked unknown node '{}' ignored", value),
        });
        self.get_checked()
    }

    pub(crate) fn apply_checked(&mut self, key: NodeKey, checked: bool) {
        let Some(node) = self.arena.get(key) else {
            return;
        };
        if self.config.check_strictly {
            if node.checked != checked {
                if let Some(node) = self.arena.get_mut(key) {
                    node.checked = checked;
                }
                self.touch(key);
            }
            return;
        }
        if node.checked == checked && !node.indeterminate {
            return;
        }

        // Fan out over the subtree, leaving disabled branches untouched.
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let Some(node) = self.arena.get_mut(current) else {
                continue;
            };
            if current != key && node.disabled {
                continue;
            }
            let changed = node.checked != checked || node.indeterminate;
            node.checked = checked;
            node.indeterminate = false;
            stack.extend(node.children.iter().copied());
            if changed {
                self.touch(current);
            }
        }
        self.aggregate_subtree(key);
        let parent = self.arena.get(key).and_then(|n| n.parent);
        self.refresh_ancestors_from(parent);
    }

    /// Recompute a parent's checked/indeterminate flags from its direct children.
    fn aggregate(&mut self, key: NodeKey) {
        let Some(node) = self.arena.get(key) else {
            return;
        };
        if node.children.is_empty() {
            return;
        }
        // Disabled children do not hold the parent back unless every child is disabled.
        let mut all = true;
        let mut all_enabled = true;
        let mut enabled = 0usize;
        let mut any = false;
        for child in &node.children {
            if let Some(child) = self.arena.get(*child) {
                all &= child.checked;
                if !child.disabled {
                    enabled += 1;
                    all_enabled &= child.checked;
                }
                any |= child.checked || child.indeterminate;
            }
        }
        let all = if enabled > 0 { all_enabled } else { all };
        let indeterminate = !all && any;
        let changed = node.checked != all || node.indeterminate != indeterminate;
        if changed {
            if let Some(node) = self.arena.get_mut(key) {
                node.checked = all;
                node.indeterminate = indeterminate;
            }
            self.touch(key);
        }
    }

    /// Aggregate every parent in the subtree, deepest first.
    pub(crate) fn aggregate_subtree(&mut self, key: NodeKey) {
        if self.config.check_strictly {
            return;
        }
        for current in self.walk_from(key).into_iter().rev() {
            self.aggregate(current);
        }
    }

    /// Aggregate `start` and each of its ancestors, bottom-up.
    pub(crate) fn refresh_ancestors_from(&mut self, start: Option<NodeKey>) {
        if self.config.check_strictly {
            return;
        }
        let mut current = start;
        while let Some(key) = current {
            self.aggregate(key);
            current = self.arena.get(key).and_then(|n| n.parent);
        }
    }

    /// Checked values as reported under the configured [`ValueMode`].
    pub fn get_checked(&self) -> Vec<NodeValue> {
        let mode = self.config.value_mode;
        self.walk()
            .into_iter()
            .filter_map(|key| {
                let node = self.arena.get(key)?;
                if !node.checked {
                    return None;
                }
                let reported = match mode {
                    ValueMode::All => true,
                    ValueMode::OnlyLeaf => node.children.is_empty(),
                    ValueMode::ParentFirst => !node
                        .parent
                        .and_then(|p| self.arena.get(p))
                        .is_some_and(|p| p.checked),
                };
                reported.then(|| node.value.clone())
            })
            .collect()
    }

    /// Replace the checked set.
    ///
    /// Only nodes whose membership changes are touched: removals first, then
    /// additions, each in depth-first order. Unknown values are ignored.
    pub fn set_checked<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        let target: HashSet<NodeValue> = values.into_iter().map(Into::into).collect();
        self.batch(|store| {
            let current: HashSet<NodeValue> = store.get_checked().into_iter().collect();
            for key in store.walk() {
                let Some(value) = store.arena.get(key).map(|n| &n.value) else {
                    continue;
                };
                if current.contains(value) && !target.contains(value) {
                    store.apply_checked(key, false);
                }
            }
            for key in store.walk() {
                let Some(value) = store.arena.get(key).map(|n| &n.value) else {
                    continue;
                };
                if target.contains(value) && !current.contains(value) {
                    store.apply_checked(key, true);
                }
            }
        });
    }

    // -------------------------------------------------------------------------
    // Expanded
    // -------------------------------------------------------------------------

    /// Expand or collapse one node and return every expanded value.
    pub fn set_node_expanded(&mut self, value: &NodeValue, expanded: bool) -> Vec<NodeValue> {
        self.batch(|store| match store.key_of(value) {
            Some(key) => store.apply_expanded(key, expanded),
            None => debug!("TreeStore: set_node_expanded unknown node '{}' ignored", value),
        });
        self.get_expanded()
    }

    pub(crate) fn apply_expanded(&mut self, key: NodeKey, expanded: bool) {
        if !expanded {
            self.set_expanded_flag(key, false);
            return;
        }
        let mut chain = Vec::new();
        if self.config.expand_parent {
            let mut current = self.arena.get(key).and_then(|n| n.parent);
            while let Some(parent) = current {
                chain.push(parent);
                current = self.arena.get(parent).and_then(|n| n.parent);
            }
            chain.reverse();
        }
        chain.push(key);
        for key in chain {
            self.expand_one(key);
        }
    }

    fn expand_one(&mut self, key: NodeKey) {
        if self.arena.get(key).is_none_or(|n| n.expanded) {
            return;
        }
        if self.config.expand_mutex {
            let siblings: Vec<NodeKey> = self.sibling_keys(key).to_vec();
            for sibling in siblings {
                if sibling != key {
                    self.collapse_subtree(sibling);
                }
            }
        }
        self.set_expanded_flag(key, true);
        let pending = self
            .arena
            .get(key)
            .is_some_and(|n| n.lazy_children && !n.loading);
        if pending {
            self.start_load(key);
        }
    }

    /// Collapse `key` and all of its expanded descendants.
    fn collapse_subtree(&mut self, key: NodeKey) {
        for current in self.walk_from(key) {
            self.set_expanded_flag(current, false);
        }
    }

    fn set_expanded_flag(&mut self, key: NodeKey, expanded: bool) {
        let changed = match self.arena.get_mut(key) {
            Some(node) if node.expanded != expanded => {
                node.expanded = expanded;
                true
            }
            _ => false,
        };
        if changed {
            self.touch(key);
            self.mark_reflow();
        }
    }

    /// Every expanded value in depth-first order.
    pub fn get_expanded(&self) -> Vec<NodeValue> {
        self.walk()
            .into_iter()
            .filter_map(|key| self.arena.get(key))
            .filter(|n| n.expanded)
            .map(|n| n.value.clone())
            .collect()
    }

    /// Replace the expanded set.
    pub fn set_expanded<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        let target: HashSet<NodeValue> = values.into_iter().map(Into::into).collect();
        self.batch(|store| {
            for key in store.walk() {
                let Some(node) = store.arena.get(key) else {
                    continue;
                };
                if node.expanded && !target.contains(&node.value) {
                    store.set_expanded_flag(key, false);
                }
            }
            for key in store.walk() {
                let Some(node) = store.arena.get(key) else {
                    continue;
                };
                if !node.expanded && target.contains(&node.value) {
                    store.apply_expanded(key, true);
                }
            }
        });
    }

    // -------------------------------------------------------------------------
    // Actived
    // -------------------------------------------------------------------------

    /// Activate or deactivate one node and return every actived value.
    ///
    /// No-op when the tree is not activable or the node is disabled.
    pub fn set_node_actived(&mut self, value: &NodeValue, actived: bool) -> Vec<NodeValue> {
        self.batch(|store| match store.key_of(value) {
            Some(key) if store.config.activable && !store.is_disabled_key(key) => {
                store.apply_actived(key, actived);
            }
            Some(_) => debug!("TreeStore: node '{}' is not activable", value),
            None => debug!("TreeStore: set_node_actived unknown node '{}' ignored", value),
        });
        self.get_actived()
    }

    pub(crate) fn apply_actived(&mut self, key: NodeKey, actived: bool) {
        if self.arena.get(key).is_none_or(|n| n.actived == actived) {
            return;
        }
        if actived && !self.config.active_multiple {
            let others: Vec<NodeKey> = self
                .arena
                .iter()
                .filter(|(k, n)| *k != key && n.actived)
                .map(|(k, _)| k)
                .collect();
            for other in others {
                self.set_actived_flag(other, false);
            }
        }
        self.set_actived_flag(key, actived);
    }

    fn set_actived_flag(&mut self, key: NodeKey, actived: bool) {
        if let Some(node) = self.arena.get_mut(key) {
            node.actived = actived;
        }
        self.touch(key);
    }

    /// Every actived value in depth-first order.
    pub fn get_actived(&self) -> Vec<NodeValue> {
        self.walk()
            .into_iter()
            .filter_map(|key| self.arena.get(key))
            .filter(|n| n.actived)
            .map(|n| n.value.clone())
            .collect()
    }

    /// Replace the actived set.
    ///
    /// Without `active_multiple` only the first value is kept.
    pub fn set_actived<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<NodeValue>,
    {
        let mut values: Vec<NodeValue> = values.into_iter().map(Into::into).collect();
        if !self.config.active_multiple {
            values.truncate(1);
        }
        let target: HashSet<NodeValue> = values.into_iter().collect();
        self.batch(|store| {
            for key in store.walk() {
                let Some(node) = store.arena.get(key) else {
                    continue;
                };
                if node.actived && !target.contains(&node.value) {
                    store.set_actived_flag(key, false);
                }
            }
            for key in store.walk() {
                let Some(node) = store.arena.get(key) else {
                    continue;
                };
                if !node.actived && target.contains(&node.value) {
                    store.apply_actived(key, true);
                }
            }
        });
    }

    // -------------------------------------------------------------------------
    // Generic state and configuration
    // -------------------------------------------------------------------------

    /// Apply a partial node update.
    ///
    /// `checked`, `expanded` and `actived` go through the cascading setters;
    /// the remaining fields are merged directly.
    pub fn set_node_state(&mut self, value: &NodeValue, patch: NodeStatePatch) {
        self.batch(|store| {
            let Some(key) = store.key_of(value) else {
                debug!("TreeStore: set_node_state unknown node '{}' ignored", value);
                return;
            };
            if let Some(expanded) = patch.expanded {
                store.set_node_expanded(value, expanded);
            }
            if let Some(actived) = patch.actived {
                store.set_node_actived(value, actived);
            }
            if let Some(checked) = patch.checked {
                store.set_node_checked(value, checked);
            }
            let mut visibility = false;
            if let Some(node) = store.arena.get_mut(key) {
                if let Some(label) = patch.label {
                    node.label = label;
                }
                if let Some(disabled) = patch.disabled {
                    node.disabled = disabled;
                    visibility = true;
                }
                if let Some(data) = patch.data {
                    node.data.extend(data);
                }
            }
            store.touch(key);
            if visibility {
                let parent = store.arena.get(key).and_then(|n| n.parent);
                store.refresh_ancestors_from(parent);
            }
            if visibility || store.config.filter.is_some() {
                store.mark_reflow();
            }
        });
    }

    /// Merge configuration.
    ///
    /// Filter and disabled changes recompute visibility. Turning off
    /// `active_multiple` keeps only the first actived node. Turning off
    /// `check_strictly` re-aggregates every parent.
    pub fn set_config(&mut self, patch: TreeConfigPatch) {
        self.batch(|store| {
            let visibility = patch.affects_visibility();
            let was_strict = store.config.check_strictly;
            let config = &mut store.config;
            if let Some(keys) = patch.keys {
                config.keys = keys;
            }
            if let Some(v) = patch.activable {
                config.activable = v;
            }
            if let Some(v) = patch.active_multiple {
                config.active_multiple = v;
            }
            if let Some(v) = patch.checkable {
                config.checkable = v;
            }
            if let Some(v) = patch.check_strictly {
                config.check_strictly = v;
            }
            if let Some(v) = patch.disabled {
                config.disabled = v;
            }
            if let Some(v) = patch.expand_all {
                config.expand_all = v;
            }
            if let Some(v) = patch.expand_level {
                config.expand_level = v;
            }
            if let Some(v) = patch.expand_mutex {
                config.expand_mutex = v;
            }
            if let Some(v) = patch.expand_parent {
                config.expand_parent = v;
            }
            if let Some(v) = patch.lazy {
                config.lazy = v;
            }
            if let Some(v) = patch.load {
                config.load = v;
            }
            if let Some(v) = patch.filter {
                config.filter = v;
            }
            if let Some(v) = patch.value_mode {
                config.value_mode = v;
            }

            if !store.config.active_multiple {
                let actived = store.get_actived();
                if actived.len() > 1 {
                    store.set_actived(actived.into_iter().take(1));
                }
            }
            if was_strict && !store.config.check_strictly {
                let roots: Vec<NodeKey> = store.roots().iter().map(|n| n.key()).collect();
                for root in roots {
                    store.aggregate_subtree(root);
                }
            }
            if visibility {
                for key in store.walk() {
                    store.touch(key);
                }
                store.mark_reflow();
            }
        });
    }
}
