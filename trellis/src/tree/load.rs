//! Lazy loading of node children.
//!
//! Load futures run as spawned Tokio tasks and report back over a channel,
//! so the store stays usable while a load is in flight. Results are applied
//! only when the host asks for them, and only if the requesting node still
//! exists: arena keys are generational, so a removed node (or a new node
//! reusing its value) never receives a stale result.

use log::{debug, warn};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::error::LoadError;
use super::events::StoreEvent;
use super::node::{NodeKey, NodeRef};
use super::store::{Anchor, TreeStore};
use super::value::NodeValue;

/// Result of one load, tagged with the node that asked for it.
#[derive(Debug)]
pub(crate) struct LoadOutcome {
    key: NodeKey,
    value: NodeValue,
    result: Result<Vec<Value>, LoadError>,
}

#[derive(Debug)]
pub(crate) struct LoadChannel {
    tx: UnboundedSender<LoadOutcome>,
    rx: UnboundedReceiver<LoadOutcome>,
    in_flight: usize,
}

impl LoadChannel {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            in_flight: 0,
        }
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Children were appended and `loading` cleared.
    Loaded(NodeValue),
    /// The load function failed; the node stays `loading`.
    Failed(NodeValue, LoadError),
    /// The node was removed before the load finished; the result was dropped.
    Stale(NodeValue),
}

impl TreeStore {
    /// Start loading children for `key` with the configured `load` function.
    pub(crate) fn start_load(&mut self, key: NodeKey) {
        let Some(load) = self.config.load.clone() else {
            debug!("TreeStore: no load function configured, lazy node left unloaded");
            return;
        };
        let Some(model) = NodeRef::new(self, key).map(|node| node.model()) else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                "TreeStore: cannot load children of '{}' outside a Tokio runtime",
                model.value
            );
            return;
        };
        if let Some(node) = self.arena.get_mut(key) {
            node.loading = true;
        }
        self.touch(key);

        debug!("TreeStore: loading children of '{}'", model.value);
        let value = model.value.clone();
        let tx = self.loads.tx.clone();
        let future = load.call(model);
        let task = runtime.spawn(future);
        runtime.spawn(async move {
            // A panicking load still reports, so `in_flight` always drains.
            let result = match task.await {
                Ok(result) => result,
                Err(err) => Err(LoadError::new(format!("load task failed: {}", err))),
            };
            // The receiver is gone only if the store was dropped.
            let _ = tx.send(LoadOutcome { key, value, result });
        });
        self.loads.in_flight += 1;
    }

    /// Number of loads started but not yet applied.
    pub fn pending_loads(&self) -> usize {
        self.loads.in_flight
    }

    /// Wait for the next load to finish and apply it.
    ///
    /// Returns `None` immediately when no load is in flight. A load whose task
    /// panics comes back as [`LoadStatus::Failed`]. A load that never resolves
    /// makes this wait forever; callers wanting a bound should wrap it in
    /// `tokio::time::timeout`.
    pub async fn next_load(&mut self) -> Option<LoadStatus> {
        if self.loads.in_flight == 0 {
            return None;
        }
        let outcome = self.loads.rx.recv().await?;
        Some(self.apply_load(outcome))
    }

    /// Apply every load that has already finished, without waiting.
    pub fn apply_loads(&mut self) -> Vec<LoadStatus> {
        let mut statuses = Vec::new();
        while let Ok(outcome) = self.loads.rx.try_recv() {
            statuses.push(self.apply_load(outcome));
        }
        statuses
    }

    fn apply_load(&mut self, outcome: LoadOutcome) -> LoadStatus {
        self.loads.in_flight = self.loads.in_flight.saturating_sub(1);
        let LoadOutcome { key, value, result } = outcome;
        if !self.arena.contains_key(key) {
            debug!("TreeStore: dropping loaded children of removed node '{}'", value);
            return LoadStatus::Stale(value);
        }
        let children = match result {
            Ok(children) => children,
            Err(err) => {
                warn!("TreeStore: loading children of '{}' failed: {}", value, err);
                return LoadStatus::Failed(value, err);
            }
        };

        self.batch(|store| {
            for item in &children {
                if let Err(err) = store.insert_item(item, Some(key), Anchor::End) {
                    warn!("TreeStore: loaded child of '{}' rejected: {}", value, err);
                    break;
                }
            }
            if let Some(node) = store.arena.get_mut(key) {
                node.loading = false;
                node.lazy_children = false;
            }
            store.touch(key);
            store.mark_reflow();
        });

        if let Some(model) = NodeRef::new(self, key).map(|node| node.model()) {
            if let Some(hook) = &self.config.on_load {
                hook.call(&model);
            }
            self.push_event(StoreEvent::Load { node: model });
        }
        LoadStatus::Loaded(value)
    }
}
