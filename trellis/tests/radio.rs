//! Tests for radio group state.

use trellis::radio::{RadioChange, RadioGroup, RadioOption};

fn group() -> RadioGroup<&'static str> {
    RadioGroup::with_options(vec![
        RadioOption::new("Light", "light"),
        RadioOption::new("Dark", "dark"),
        RadioOption::new("System", "system").disabled(true),
    ])
    .with_name("theme")
}

#[test]
fn test_select_records_change() {
    let radio = group();
    assert!(radio.select(&"dark"));
    assert_eq!(radio.value(), Some("dark"));
    assert_eq!(radio.selected_label(), Some("Dark".to_string()));
    assert!(radio.is_dirty());

    radio.select(&"light");
    assert_eq!(
        radio.take_events(),
        vec![
            RadioChange {
                value: "dark",
                previous: None
            },
            RadioChange {
                value: "light",
                previous: Some("dark")
            },
        ]
    );
    assert!(radio.take_events().is_empty());
}

#[test]
fn test_select_same_value_is_noop() {
    let radio = group().with_value("light");
    assert!(!radio.select(&"light"));
    assert!(radio.take_events().is_empty());
    assert!(!radio.is_dirty());
}

#[test]
fn test_disabled_option_ignored() {
    let radio = group();
    assert!(!radio.select(&"system"));
    assert_eq!(radio.value(), None);
}

#[test]
fn test_disabled_group_ignored() {
    let radio = group();
    radio.set_disabled(true);
    radio.clear_dirty();
    assert!(!radio.select(&"dark"));
    assert!(radio.take_events().is_empty());
    assert!(!radio.is_dirty());
}

#[test]
fn test_unknown_value_ignored() {
    let radio = group();
    assert!(!radio.select(&"sepia"));
    assert_eq!(radio.value(), None);
}

#[test]
fn test_clones_share_state() {
    let radio = group();
    let handle = radio.clone();
    handle.select(&"dark");
    assert_eq!(radio.value(), Some("dark"));
    assert_eq!(radio.id(), handle.id());
    assert_eq!(radio.name(), Some("theme".to_string()));
}

#[test]
fn test_set_options_drops_missing_selection() {
    let radio = group().with_value("dark");
    radio.set_options(vec![RadioOption::new("Light", "light")]);
    assert_eq!(radio.value(), None);
    assert_eq!(radio.len(), 1);
}
