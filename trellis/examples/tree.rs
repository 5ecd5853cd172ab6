//! Drives a tree component from the terminal: prints rendered rows and events.

use std::fs::File;
use std::time::Duration;

use serde_json::json;
use simplelog::{Config, LevelFilter, WriteLogger};
use trellis::prelude::*;

/// Rows are the printed line for a node.
struct Printer;

impl ViewFactory<String> for Printer {
    fn create(&mut self, node: &TreeNodeModel) -> String {
        render(node)
    }

    fn update(&mut self, handle: &mut String, node: &TreeNodeModel) {
        *handle = render(node);
    }
}

fn render(node: &TreeNodeModel) -> String {
    let marker = if node.is_leaf {
        " "
    } else if node.expanded {
        "v"
    } else {
        ">"
    };
    let check = if node.checked {
        "[x]"
    } else if node.indeterminate {
        "[-]"
    } else {
        "[ ]"
    };
    let loading = if node.loading { " ..." } else { "" };
    format!("{}{} {} {}{}", "  ".repeat(node.level), marker, check, node.label, loading)
}

fn print(tree: &mut Tree<String, Printer>) {
    for (_, row) in tree.views().iter() {
        println!("{}", row);
    }
    for event in tree.take_events() {
        println!("  event: {} ({})", event.name(), event.context().node.value);
    }
    println!();
}

#[tokio::main]
async fn main() {
    let log_file = File::create("trellis-tree.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let load = LoadFn::new(|node| async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok::<_, LoadError>(vec![
            json!({"value": format!("{}/readme", node.value), "label": "README.md"}),
            json!({"value": format!("{}/main", node.value), "label": "main.rs"}),
        ])
    });
    let config = TreeConfig::default()
        .checkable(true)
        .activable(true)
        .expand_parent(true)
        .lazy(true)
        .load(load);
    let data = vec![
        json!({"value": "docs", "label": "docs", "children": [
            {"value": "guide", "label": "guide.md"},
            {"value": "api", "label": "api.md"}
        ]}),
        json!({"value": "src", "label": "src", "children": true}),
    ];

    let mut tree = match Tree::new(TreeProps::new(data).config(config).expanded(["docs"]), Printer) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };
    print(&mut tree);

    tree.handle_change(&NodeValue::from("guide"));
    print(&mut tree);

    tree.handle_click(
        &NodeValue::from("src"),
        Some(ClickEvent::default()),
        &ClickMarks::none().trigger("expand"),
    );
    print(&mut tree);

    while tree.store().pending_loads() > 0 {
        if let Some(status) = tree.next_load().await {
            println!("load: {:?}", status);
        }
    }
    print(&mut tree);

    tree.set_filter(Some(TreeFilter::fuzzy("md")));
    print(&mut tree);
}
