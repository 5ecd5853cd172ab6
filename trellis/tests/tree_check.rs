//! Tests for checked state cascading and value modes.

use serde_json::{Value, json};

use trellis::tree::{
    NodeStatePatch, NodeValue, Tree, TreeConfig, TreeConfigPatch, TreeNodeModel, TreeProps,
    TreeStore, ValueMode, ViewFactory,
};

fn v(value: &str) -> NodeValue {
    NodeValue::from(value)
}

fn abc() -> Vec<Value> {
    vec![json!({"value": "A", "children": [{"value": "B"}, {"value": "C"}]})]
}

fn store(config: TreeConfig, data: Vec<Value>) -> TreeStore {
    TreeStore::with_data(config.checkable(true), data).unwrap()
}

/// Rows carry nothing; only the store state matters here.
struct Blank;

impl ViewFactory<()> for Blank {
    fn create(&mut self, _node: &TreeNodeModel) {}
}

fn flags(store: &TreeStore, value: &str) -> (bool, bool) {
    let node = store.get_node(&v(value)).unwrap();
    (node.is_checked(), node.is_indeterminate())
}

#[test]
fn test_checking_children_aggregates_parent() {
    let mut store = store(TreeConfig::default(), abc());

    store.set_node_checked(&v("B"), true);
    assert_eq!(flags(&store, "A"), (false, true));

    let checked = store.set_node_checked(&v("C"), true);
    assert_eq!(flags(&store, "A"), (true, false));
    assert_eq!(checked, vec![v("B"), v("C")]);
}

#[test]
fn test_checking_parent_fans_out() {
    let mut store = store(TreeConfig::default(), abc());
    store.set_node_checked(&v("A"), true);
    assert_eq!(flags(&store, "B"), (true, false));
    assert_eq!(flags(&store, "C"), (true, false));

    store.set_node_checked(&v("A"), false);
    assert!(store.get_checked().is_empty());
    assert_eq!(flags(&store, "A"), (false, false));
}

#[test]
fn test_strict_mode_is_independent() {
    let mut store = store(TreeConfig::default().check_strictly(true), abc());
    store.set_node_checked(&v("A"), true);
    assert_eq!(flags(&store, "A"), (true, false));
    assert_eq!(flags(&store, "B"), (false, false));

    store.set_node_checked(&v("B"), true);
    store.set_node_checked(&v("C"), true);
    store.set_node_checked(&v("A"), false);
    assert_eq!(flags(&store, "A"), (false, false));
    assert!(store.get_node(&v("B")).unwrap().is_checked());
}

#[test]
fn test_value_modes() {
    let mut all = store(TreeConfig::default().value_mode(ValueMode::All), abc());
    all.set_node_checked(&v("A"), true);
    assert_eq!(all.get_checked(), vec![v("A"), v("B"), v("C")]);

    let mut leaf = store(TreeConfig::default(), abc());
    leaf.set_node_checked(&v("A"), true);
    assert_eq!(leaf.get_checked(), vec![v("B"), v("C")]);

    let mut parent = store(TreeConfig::default().value_mode(ValueMode::ParentFirst), abc());
    parent.set_node_checked(&v("A"), true);
    assert_eq!(parent.get_checked(), vec![v("A")]);
    parent.set_node_checked(&v("C"), false);
    assert_eq!(parent.get_checked(), vec![v("B")]);
}

#[test]
fn test_disabled_child_is_skipped_by_fan_out() {
    let data = vec![json!({"value": "A", "children": [
        {"value": "B"},
        {"value": "C", "disabled": true}
    ]})];
    let mut store = store(TreeConfig::default(), data);
    let checked = store.set_node_checked(&v("A"), true);
    assert_eq!(checked, vec![v("B")]);
    assert_eq!(flags(&store, "C"), (false, false));
    assert_eq!(flags(&store, "A"), (true, false));
}

#[test]
fn test_disabled_checked_child_keeps_parent_indeterminate() {
    let data = vec![json!({"value": "A", "children": [
        {"value": "B"},
        {"value": "C", "disabled": true, "checked": true}
    ]})];
    let mut store = store(TreeConfig::default(), data);
    assert_eq!(flags(&store, "A"), (false, true));

    store.set_node_checked(&v("A"), true);
    assert_eq!(flags(&store, "A"), (true, false));
    store.set_node_checked(&v("A"), false);
    assert_eq!(flags(&store, "A"), (false, true));
    assert_eq!(flags(&store, "C"), (true, false));
}

#[test]
fn test_disabling_unchecked_child_reaggregates_parent() {
    let mut store = store(TreeConfig::default(), abc());
    store.set_node_checked(&v("B"), true);
    assert_eq!(flags(&store, "A"), (false, true));

    store.set_node_state(&v("C"), NodeStatePatch::new().disabled(true));
    assert_eq!(flags(&store, "A"), (true, false));

    store.set_node_state(&v("C"), NodeStatePatch::new().disabled(false));
    assert_eq!(flags(&store, "A"), (false, true));
}

#[test]
fn test_toggling_parent_over_disabled_child() {
    let data = vec![json!({"value": "P", "children": [
        {"value": "D", "disabled": true},
        {"value": "C"}
    ]})];
    let props = TreeProps::new(data).config(TreeConfig::default().checkable(true));
    let mut tree = Tree::new(props, Blank).unwrap();

    tree.handle_change(&v("P"));
    assert_eq!(tree.store().get_checked(), vec![v("C")]);
    assert_eq!(flags(tree.store(), "P"), (true, false));

    tree.handle_change(&v("P"));
    assert!(tree.store().get_checked().is_empty());
    assert_eq!(flags(tree.store(), "C"), (false, false));
    assert_eq!(flags(tree.store(), "P"), (false, false));
}

#[test]
fn test_disabled_node_ignores_check() {
    let data = vec![json!({"value": "A", "disabled": true})];
    let mut store = store(TreeConfig::default(), data);
    assert!(store.set_node_checked(&v("A"), true).is_empty());
}

#[test]
fn test_not_checkable_is_noop() {
    let mut store = TreeStore::with_data(TreeConfig::default(), abc()).unwrap();
    store.set_node_checked(&v("B"), true);
    assert!(store.get_checked().is_empty());
}

#[test]
fn test_checked_parent_data_checks_children() {
    let data = vec![json!({"value": "A", "checked": true, "children": [
        {"value": "B"}, {"value": "C"}
    ]})];
    let store = store(TreeConfig::default(), data);
    assert_eq!(store.get_checked(), vec![v("B"), v("C")]);
}

#[test]
fn test_appended_child_inherits_checked_parent() {
    let mut store = store(TreeConfig::default(), abc());
    store.set_node_checked(&v("A"), true);
    store
        .append_to(Some(&v("A")), vec![json!({"value": "D"})])
        .unwrap();
    // Children of a checked parent are ingested checked.
    assert_eq!(flags(&store, "A"), (true, false));

    store.set_node_checked(&v("D"), false);
    assert_eq!(flags(&store, "A"), (false, true));
}

#[test]
fn test_removing_unchecked_child_promotes_parent() {
    let mut store = store(TreeConfig::default(), abc());
    store.set_node_checked(&v("B"), true);
    store.remove(&v("C"));
    assert_eq!(flags(&store, "A"), (true, false));
}

#[test]
fn test_set_checked_replaces_set() {
    let mut store = store(TreeConfig::default(), abc());
    store.set_checked(["B"]);
    assert_eq!(store.get_checked(), vec![v("B")]);
    assert_eq!(flags(&store, "A"), (false, true));

    store.set_checked(["C"]);
    assert_eq!(store.get_checked(), vec![v("C")]);

    store.set_checked(Vec::<NodeValue>::new());
    assert!(store.get_checked().is_empty());
    assert_eq!(flags(&store, "A"), (false, false));
}

#[test]
fn test_set_checked_ignores_unknown_values() {
    let mut store = store(TreeConfig::default(), abc());
    store.set_checked(["B", "nope"]);
    assert_eq!(store.get_checked(), vec![v("B")]);
}

#[test]
fn test_leaving_strict_mode_reaggregates() {
    let mut store = store(TreeConfig::default().check_strictly(true), abc());
    store.set_checked(["B", "C"]);
    assert_eq!(flags(&store, "A"), (false, false));

    store.set_config(TreeConfigPatch {
        check_strictly: Some(false),
        ..Default::default()
    });
    assert_eq!(flags(&store, "A"), (true, false));
}

#[test]
fn test_three_levels_indeterminate_propagates() {
    let data = vec![json!({"value": "A", "children": [
        {"value": "B", "children": [{"value": "B1"}, {"value": "B2"}]},
        {"value": "C"}
    ]})];
    let mut store = store(TreeConfig::default(), data);
    store.set_node_checked(&v("B1"), true);
    assert_eq!(flags(&store, "B"), (false, true));
    assert_eq!(flags(&store, "A"), (false, true));

    store.set_node_checked(&v("B2"), true);
    assert_eq!(flags(&store, "B"), (true, false));
    assert_eq!(flags(&store, "A"), (false, true));
}
