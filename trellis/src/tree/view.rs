//! Incremental synchronization of rendered views with the visible list.
//!
//! View handles are kept in render order. Each sync walks the store once in
//! depth-first order and relocates a handle only when its position differs,
//! so unchanged rows keep their identity (and any running transition).
//!
//! Position lookups are linear, making a sync O(n·m) in the worst case.
//! That is fine for UI-sized trees (hundreds of nodes) but does not scale to
//! millions.

use std::collections::HashSet;

use log::trace;

use super::model::TreeNodeModel;
use super::store::TreeStore;
use super::value::NodeValue;

/// Host hook that owns the lifecycle of rendered rows.
pub trait ViewFactory<H> {
    /// Render a row for a node that just became visible.
    fn create(&mut self, node: &TreeNodeModel) -> H;

    /// Re-render a retained row whose node state changed.
    fn update(&mut self, _handle: &mut H, _node: &TreeNodeModel) {}

    /// Tear down a row that is no longer shown.
    fn destroy(&mut self, _handle: H) {}
}

/// One edit applied to the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewChange {
    Insert { value: NodeValue, index: usize },
    Move { value: NodeValue, from: usize, to: usize },
    Update { value: NodeValue, index: usize },
    Remove { value: NodeValue, index: usize },
}

#[derive(Debug)]
struct ViewEntry<H> {
    value: NodeValue,
    handle: H,
}

/// Rendered rows, in display order.
#[derive(Debug)]
pub struct ViewSync<H> {
    entries: Vec<ViewEntry<H>>,
    tracked: HashSet<NodeValue>,
}

impl<H> Default for ViewSync<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            tracked: HashSet::new(),
        }
    }
}

impl<H> ViewSync<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: &NodeValue) -> bool {
        self.tracked.contains(value)
    }

    /// Rendered rows in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeValue, &H)> {
        self.entries.iter().map(|e| (&e.value, &e.handle))
    }

    pub fn values(&self) -> Vec<NodeValue> {
        self.entries.iter().map(|e| e.value.clone()).collect()
    }

    pub fn get(&self, value: &NodeValue) -> Option<&H> {
        self.entries
            .iter()
            .find(|e| &e.value == value)
            .map(|e| &e.handle)
    }

    fn position(&self, value: &NodeValue) -> Option<usize> {
        self.entries.iter().position(|e| &e.value == value)
    }

    /// Bring the rendered rows in line with the store's visible list.
    ///
    /// `updated` names nodes whose state changed since the previous sync;
    /// their retained rows are passed to [`ViewFactory::update`].
    pub fn sync<F: ViewFactory<H>>(
        &mut self,
        store: &TreeStore,
        updated: &HashSet<NodeValue>,
        factory: &mut F,
    ) -> Vec<ViewChange> {
        let mut changes = Vec::new();

        // Rows whose node left the store entirely.
        let mut i = 0;
        while i < self.entries.len() {
            if store.contains(&self.entries[i].value) {
                i += 1;
                continue;
            }
            let entry = self.entries.remove(i);
            self.tracked.remove(&entry.value);
            factory.destroy(entry.handle);
            changes.push(ViewChange::Remove {
                value: entry.value,
                index: i,
            });
        }

        let mut index = 0;
        for node in store.get_nodes(None) {
            let value = node.value();
            if !node.is_visible() {
                if let Some(pos) = self.position(value) {
                    let entry = self.entries.remove(pos);
                    self.tracked.remove(&entry.value);
                    factory.destroy(entry.handle);
                    changes.push(ViewChange::Remove {
                        value: entry.value,
                        index: pos,
                    });
                }
                continue;
            }

            match self.position(value) {
                Some(pos) => {
                    if pos != index {
                        let entry = self.entries.remove(pos);
                        self.entries.insert(index, entry);
                        changes.push(ViewChange::Move {
                            value: value.clone(),
                            from: pos,
                            to: index,
                        });
                    }
                    if updated.contains(value) {
                        factory.update(&mut self.entries[index].handle, &node.model());
                        changes.push(ViewChange::Update {
                            value: value.clone(),
                            index,
                        });
                    }
                }
                None => {
                    let handle = factory.create(&node.model());
                    self.entries.insert(
                        index,
                        ViewEntry {
                            value: value.clone(),
                            handle,
                        },
                    );
                    self.tracked.insert(value.clone());
                    changes.push(ViewChange::Insert {
                        value: value.clone(),
                        index,
                    });
                }
            }
            index += 1;
        }

        for change in &changes {
            trace!("ViewSync: {:?}", change);
        }
        changes
    }

    /// Destroy every row.
    pub fn clear<F: ViewFactory<H>>(&mut self, factory: &mut F) {
        self.tracked.clear();
        for entry in self.entries.drain(..) {
            factory.destroy(entry.handle);
        }
    }
}
