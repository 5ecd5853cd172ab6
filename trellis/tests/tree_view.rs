//! Tests for incremental view synchronization.

use std::collections::HashSet;

use serde_json::json;

use trellis::tree::{
    InsertItem, NodeValue, StoreEvent, TreeConfig, TreeNodeModel, TreeStore, ViewChange,
    ViewFactory, ViewSync,
};

fn v(value: &str) -> NodeValue {
    NodeValue::from(value)
}

/// Hands out increasing row ids and records every call.
#[derive(Debug, Default)]
struct Recorder {
    next: usize,
    created: Vec<NodeValue>,
    updated: Vec<NodeValue>,
    destroyed: Vec<usize>,
}

impl ViewFactory<usize> for Recorder {
    fn create(&mut self, node: &TreeNodeModel) -> usize {
        self.next += 1;
        self.created.push(node.value.clone());
        self.next
    }

    fn update(&mut self, _handle: &mut usize, node: &TreeNodeModel) {
        self.updated.push(node.value.clone());
    }

    fn destroy(&mut self, handle: usize) {
        self.destroyed.push(handle);
    }
}

fn store() -> TreeStore {
    TreeStore::with_data(
        TreeConfig::default().checkable(true),
        vec![
            json!({"value": "A", "children": [{"value": "A1"}, {"value": "A2"}]}),
            json!({"value": "B"}),
        ],
    )
    .unwrap()
}

fn drain_updated(store: &mut TreeStore) -> HashSet<NodeValue> {
    store
        .take_events()
        .into_iter()
        .flat_map(|event| match event {
            StoreEvent::Update { updated } => updated,
            StoreEvent::Load { .. } => Vec::new(),
        })
        .collect()
}

fn synced() -> (TreeStore, ViewSync<usize>, Recorder) {
    let mut store = store();
    let mut views = ViewSync::new();
    let mut factory = Recorder::default();
    let updated = drain_updated(&mut store);
    views.sync(&store, &updated, &mut factory);
    (store, views, factory)
}

#[test]
fn test_initial_sync_creates_visible_rows() {
    let mut store = store();
    let mut views = ViewSync::new();
    let mut factory = Recorder::default();
    let updated = drain_updated(&mut store);

    let changes = views.sync(&store, &updated, &mut factory);
    assert_eq!(
        changes,
        vec![
            ViewChange::Insert { value: v("A"), index: 0 },
            ViewChange::Insert { value: v("B"), index: 1 },
        ]
    );
    assert_eq!(views.values(), store.visible_values());
    assert_eq!(factory.created, vec![v("A"), v("B")]);
}

#[test]
fn test_expand_keeps_existing_rows() {
    let (mut store, mut views, mut factory) = synced();
    let a = *views.get(&v("A")).unwrap();
    let b = *views.get(&v("B")).unwrap();

    store.set_node_expanded(&v("A"), true);
    let updated = drain_updated(&mut store);
    let changes = views.sync(&store, &updated, &mut factory);

    let inserts: Vec<&ViewChange> = changes
        .iter()
        .filter(|c| matches!(c, ViewChange::Insert { .. }))
        .collect();
    assert_eq!(
        inserts,
        vec![
            &ViewChange::Insert { value: v("A1"), index: 1 },
            &ViewChange::Insert { value: v("A2"), index: 2 },
        ]
    );
    assert!(!changes.iter().any(|c| matches!(c, ViewChange::Move { .. })));
    assert_eq!(views.get(&v("A")), Some(&a));
    assert_eq!(views.get(&v("B")), Some(&b));
    assert_eq!(views.values(), vec![v("A"), v("A1"), v("A2"), v("B")]);
}

#[test]
fn test_collapse_destroys_hidden_rows() {
    let (mut store, mut views, mut factory) = synced();
    store.set_node_expanded(&v("A"), true);
    let updated = drain_updated(&mut store);
    views.sync(&store, &updated, &mut factory);

    store.set_node_expanded(&v("A"), false);
    let updated = drain_updated(&mut store);
    let changes = views.sync(&store, &updated, &mut factory);

    assert!(changes.contains(&ViewChange::Remove { value: v("A1"), index: 1 }));
    assert_eq!(factory.destroyed.len(), 2);
    assert_eq!(views.values(), vec![v("A"), v("B")]);
    assert!(!views.contains(&v("A1")));
}

#[test]
fn test_state_change_updates_retained_row() {
    let (mut store, mut views, mut factory) = synced();
    store.set_node_checked(&v("B"), true);
    let updated = drain_updated(&mut store);
    let changes = views.sync(&store, &updated, &mut factory);

    assert_eq!(changes, vec![ViewChange::Update { value: v("B"), index: 1 }]);
    assert_eq!(factory.updated, vec![v("B")]);
    assert_eq!(factory.created.len(), 2);
}

#[test]
fn test_move_relocates_row() {
    let (mut store, mut views, mut factory) = synced();
    let b = *views.get(&v("B")).unwrap();

    store.insert_before(&v("A"), InsertItem::Node(v("B"))).unwrap();
    let updated = drain_updated(&mut store);
    let changes = views.sync(&store, &updated, &mut factory);

    assert!(changes.contains(&ViewChange::Move {
        value: v("B"),
        from: 1,
        to: 0
    }));
    assert_eq!(views.values(), vec![v("B"), v("A")]);
    assert_eq!(views.get(&v("B")), Some(&b));
}

#[test]
fn test_removed_node_row_destroyed() {
    let (mut store, mut views, mut factory) = synced();
    let a = *views.get(&v("A")).unwrap();
    store.remove(&v("A"));
    let updated = drain_updated(&mut store);
    let changes = views.sync(&store, &updated, &mut factory);

    assert_eq!(changes, vec![ViewChange::Remove { value: v("A"), index: 0 }]);
    assert_eq!(factory.destroyed, vec![a]);
    assert_eq!(views.values(), vec![v("B")]);
}

#[test]
fn test_repeated_sync_is_stable() {
    let (store, mut views, mut factory) = synced();
    let changes = views.sync(&store, &HashSet::new(), &mut factory);
    assert!(changes.is_empty());
}

#[test]
fn test_clear_destroys_everything() {
    let (_store, mut views, mut factory) = synced();
    views.clear(&mut factory);
    assert!(views.is_empty());
    assert_eq!(factory.destroyed.len(), 2);
}
