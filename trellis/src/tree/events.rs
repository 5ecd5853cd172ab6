//! Store notifications and component events.

use crate::events::ClickEvent;

use super::model::TreeNodeModel;
use super::value::NodeValue;

/// Notification queued by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// One flush worth of changes; `updated` lists touched node values.
    Update { updated: Vec<NodeValue> },
    /// Lazy children were appended under `node`.
    Load { node: TreeNodeModel },
}

/// Context attached to every tree event.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEventContext {
    pub node: TreeNodeModel,
    /// The click that caused the event, if any.
    pub event: Option<ClickEvent>,
}

/// Event surfaced by the tree component to its host.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    /// The checked set changed.
    Change {
        checked: Vec<NodeValue>,
        ctx: TreeEventContext,
    },
    Expand {
        expanded: Vec<NodeValue>,
        ctx: TreeEventContext,
    },
    Active {
        actived: Vec<NodeValue>,
        ctx: TreeEventContext,
    },
    Click {
        ctx: TreeEventContext,
    },
    Load {
        ctx: TreeEventContext,
    },
}

impl TreeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Change { .. } => "change",
            Self::Expand { .. } => "expand",
            Self::Active { .. } => "active",
            Self::Click { .. } => "click",
            Self::Load { .. } => "load",
        }
    }

    pub fn context(&self) -> &TreeEventContext {
        match self {
            Self::Change { ctx, .. }
            | Self::Expand { ctx, .. }
            | Self::Active { ctx, .. }
            | Self::Click { ctx }
            | Self::Load { ctx } => ctx,
        }
    }
}

/// Marks found on the clicked element.
///
/// A `trigger` mark containing `expand` forces expansion on click; an
/// `ignore` mark containing `expand` or `active` suppresses that action.
/// Ignore marks win over trigger marks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickMarks {
    pub trigger: Option<String>,
    pub ignore: Option<String>,
}

impl ClickMarks {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn trigger(mut self, value: impl Into<String>) -> Self {
        self.trigger = Some(value.into());
        self
    }

    pub fn ignore(mut self, value: impl Into<String>) -> Self {
        self.ignore = Some(value.into());
        self
    }

    /// Resolve whether a click should expand and/or activate the node.
    pub(crate) fn resolve(&self, expand_on_click: bool) -> (bool, bool) {
        let mut expand = expand_on_click;
        let mut active = true;
        if self.trigger.as_deref().is_some_and(|m| m.contains("expand")) {
            expand = true;
        }
        if let Some(ignore) = self.ignore.as_deref() {
            if ignore.contains("expand") {
                expand = false;
            }
            if ignore.contains("active") {
                active = false;
            }
        }
        (expand, active)
    }
}
