//! Tests for tree store structure: ingestion, lookup, insertion, moves and removal.

use serde_json::json;

use trellis::tree::{InsertItem, NodeValue, StoreEvent, TreeConfig, TreeError, TreeKeys, TreeStore};

fn v(value: &str) -> NodeValue {
    NodeValue::from(value)
}

fn sample() -> TreeStore {
    TreeStore::with_data(
        TreeConfig::default(),
        vec![
            json!({"value": "a", "label": "A", "children": [
                {"value": "a1", "label": "A1"},
                {"value": "a2", "label": "A2", "children": [
                    {"value": "a2x", "label": "A2X"}
                ]}
            ]}),
            json!({"value": "b", "label": "B"}),
        ],
    )
    .unwrap()
}

fn child_values(store: &TreeStore, parent: Option<&NodeValue>) -> Vec<NodeValue> {
    match parent {
        Some(_) => store
            .get_nodes(parent)
            .iter()
            .map(|n| n.value().clone())
            .collect(),
        None => store.roots().iter().map(|n| n.value().clone()).collect(),
    }
}

#[test]
fn test_append_builds_index_and_levels() {
    let store = sample();
    assert_eq!(store.len(), 5);
    assert_eq!(store.get_node(&v("a")).unwrap().level(), 0);
    assert_eq!(store.get_node(&v("a2")).unwrap().level(), 1);
    assert_eq!(store.get_node(&v("a2x")).unwrap().level(), 2);
    assert_eq!(store.get_parent(&v("a2x")).unwrap().value(), &v("a2"));
    let parents: Vec<NodeValue> = store
        .get_parents(&v("a2x"))
        .iter()
        .map(|n| n.value().clone())
        .collect();
    assert_eq!(parents, vec![v("a"), v("a2")]);
}

#[test]
fn test_every_node_reachable_from_roots() {
    let store = sample();
    let all = store.get_nodes(None);
    assert_eq!(all.len(), store.len());
    for node in &all {
        assert!(store.contains(node.value()));
        assert_eq!(node.level(), node.parents().len());
    }
    let order: Vec<NodeValue> = all.iter().map(|n| n.value().clone()).collect();
    assert_eq!(order, vec![v("a"), v("a1"), v("a2"), v("a2x"), v("b")]);
}

#[test]
fn test_duplicate_value_rejected_atomically() {
    let mut store = sample();
    let result = store.append(vec![json!({"value": "c", "children": [{"value": "a1"}]})]);
    assert_eq!(result, Err(TreeError::DuplicateValue(v("a1"))));
    assert!(!store.contains(&v("c")));
    assert_eq!(store.len(), 5);
}

#[test]
fn test_duplicate_within_one_item() {
    let mut store = TreeStore::default();
    let result = store.append(vec![json!({"value": 1, "children": [{"value": 1}]})]);
    assert_eq!(result, Err(TreeError::DuplicateValue(NodeValue::from(1))));
    assert!(store.is_empty());
}

#[test]
fn test_batch_insert_stops_at_first_error() {
    let mut store = TreeStore::default();
    let result = store.append(vec![
        json!({"value": "x"}),
        json!({"value": "x"}),
        json!({"value": "y"}),
    ]);
    assert!(result.is_err());
    assert!(store.contains(&v("x")));
    assert!(!store.contains(&v("y")));
}

#[test]
fn test_invalid_item() {
    let mut store = TreeStore::default();
    let result = store.append(vec![json!(5)]);
    assert!(matches!(result, Err(TreeError::InvalidItem(_))));
}

#[test]
fn test_missing_value_is_generated() {
    let mut store = TreeStore::default();
    store
        .append(vec![json!({"label": "one"}), json!({"label": "two"})])
        .unwrap();
    let roots = store.roots();
    assert_eq!(roots.len(), 2);
    assert_ne!(roots[0].value(), roots[1].value());
    assert!(roots[0].value().to_string().starts_with('t'));
    assert_eq!(roots[0].label(), "one");
}

#[test]
fn test_missing_label_defaults_to_empty() {
    let store = TreeStore::with_data(TreeConfig::default(), vec![json!({"value": 3})]).unwrap();
    assert_eq!(store.get_node(&NodeValue::from(3)).unwrap().label(), "");
}

#[test]
fn test_string_and_int_values_are_distinct() {
    let store = TreeStore::with_data(
        TreeConfig::default(),
        vec![json!({"value": 1}), json!({"value": "1"})],
    )
    .unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_custom_keys() {
    let config = TreeConfig::default().keys(TreeKeys::new("id", "name", "items"));
    let store = TreeStore::with_data(
        config,
        vec![json!({"id": 7, "name": "Seven", "items": [{"id": 8, "name": "Eight"}]})],
    )
    .unwrap();
    let node = store.get_node(&NodeValue::from(8)).unwrap();
    assert_eq!(node.label(), "Eight");
    assert_eq!(node.parent().unwrap().value(), &NodeValue::from(7));
}

#[test]
fn test_insert_before_and_after() {
    let mut store = sample();
    store.insert_before(&v("b"), json!({"value": "c"})).unwrap();
    assert_eq!(child_values(&store, None), vec![v("a"), v("c"), v("b")]);

    store.insert_after(&v("a1"), json!({"value": "a1b"})).unwrap();
    assert_eq!(
        child_values(&store, Some(&v("a"))),
        vec![v("a1"), v("a1b"), v("a2")]
    );
    assert_eq!(store.get_node(&v("a1b")).unwrap().level(), 1);
}

#[test]
fn test_insert_relative_to_unknown_is_noop() {
    let mut store = sample();
    store.insert_before(&v("missing"), json!({"value": "c"})).unwrap();
    assert!(!store.contains(&v("c")));
}

#[test]
fn test_move_node_recomputes_levels() {
    let mut store = sample();
    store
        .append_nodes(Some(&v("b")), InsertItem::Node(v("a2")))
        .unwrap();
    assert_eq!(store.get_parent(&v("a2")).unwrap().value(), &v("b"));
    assert_eq!(child_values(&store, Some(&v("a"))), vec![v("a1")]);
    assert_eq!(store.get_node(&v("a2x")).unwrap().level(), 2);

    store.insert_after(&v("b"), InsertItem::Node(v("a2"))).unwrap();
    assert!(store.get_node(&v("a2")).unwrap().is_root());
    assert_eq!(store.get_node(&v("a2")).unwrap().level(), 0);
    assert_eq!(store.get_node(&v("a2x")).unwrap().level(), 1);
    assert_eq!(store.len(), 5);
}

#[test]
fn test_move_into_own_subtree_fails() {
    let mut store = sample();
    let result = store.append_nodes(Some(&v("a2x")), InsertItem::Node(v("a")));
    assert_eq!(result, Err(TreeError::CyclicMove(v("a"))));
    assert!(store.get_node(&v("a")).unwrap().is_root());
}

#[test]
fn test_remove_subtree() {
    let mut store = sample();
    store.remove(&v("a"));
    assert_eq!(store.len(), 1);
    assert!(store.get_node(&v("a2x")).is_none());
    assert_eq!(child_values(&store, None), vec![v("b")]);
}

#[test]
fn test_remove_unknown_is_noop() {
    let mut store = sample();
    store.take_events();
    store.remove(&v("zzz"));
    assert!(!store.has_pending_events());
    assert_eq!(store.len(), 5);
}

#[test]
fn test_reload_replaces_data() {
    let mut store = sample();
    store.reload(vec![json!({"value": "z"})]).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.contains(&v("z")));
    assert!(!store.contains(&v("a")));
}

#[test]
fn test_batch_coalesces_notifications() {
    let mut store = sample();
    store.take_events();
    store.batch(|s| {
        s.set_node_expanded(&v("a"), true);
        s.set_node_expanded(&v("a2"), true);
    });
    let events = store.take_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        StoreEvent::Update { updated } => {
            assert!(updated.contains(&v("a")));
            assert!(updated.contains(&v("a2")));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_unknown_lookups_are_empty() {
    let store = sample();
    let missing = v("nope");
    assert!(store.get_node(&missing).is_none());
    assert!(store.get_nodes(Some(&missing)).is_empty());
    assert!(store.get_parents(&missing).is_empty());
    assert!(store.get_node_index(&missing).is_none());
}

#[test]
fn test_siblings_and_positions() {
    let store = sample();
    let a1 = store.get_node(&v("a1")).unwrap();
    let a2 = store.get_node(&v("a2")).unwrap();
    assert!(a1.is_first());
    assert!(!a1.is_last());
    assert!(a2.is_last());
    assert_eq!(a2.index(), 1);
    let siblings: Vec<NodeValue> = a1.siblings().iter().map(|n| n.value().clone()).collect();
    assert_eq!(siblings, vec![v("a2")]);
}

#[test]
fn test_model_snapshot() {
    let store = sample();
    let model = store.get_node(&v("a2")).unwrap().model();
    assert_eq!(model.label, "A2");
    assert_eq!(model.parent, Some(v("a")));
    assert_eq!(model.children, vec![v("a2x")]);
    assert_eq!(model.level, 1);
    assert!(!model.is_leaf);
    assert_eq!(model.get("label"), Some(&json!("A2")));
    assert!(model.get("children").is_none());
}
