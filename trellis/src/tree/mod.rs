//! Tree view: node store, cascading state, lazy loading and view sync.

mod cascade;
mod component;
mod config;
mod error;
mod events;
mod filter;
mod load;
mod model;
mod node;
mod store;
mod value;
mod view;

pub use component::{Tree, TreeProps};
pub use config::{
    LoadFn, LoadFuture, LoadHook, TreeConfig, TreeConfigPatch, TreeFilter, TreeKeys, UpdateHook,
    ValueMode,
};
pub use error::{LoadError, TreeError};
pub use events::{ClickMarks, StoreEvent, TreeEvent, TreeEventContext};
pub use filter::fuzzy_score;
pub use load::LoadStatus;
pub use model::TreeNodeModel;
pub use node::{NodeKey, NodeRef, NodeStatePatch, TreeNode};
pub use store::{InsertItem, TreeStore};
pub use value::NodeValue;
pub use view::{ViewChange, ViewFactory, ViewSync};
