pub mod events;
pub mod notification;
pub mod radio;
pub mod tree;
pub mod upload;

pub mod prelude {
    pub use crate::events::{ClickEvent, ClickKind, Modifiers, Position};
    pub use crate::notification::{Notification, NotificationEvent, NotificationIcon, NotificationTheme};
    pub use crate::radio::{RadioChange, RadioGroup, RadioGroupId, RadioOption};
    pub use crate::tree::{
        ClickMarks, InsertItem, LoadError, LoadFn, LoadStatus, NodeStatePatch, NodeValue, Tree,
        TreeConfig, TreeError, TreeEvent, TreeFilter, TreeKeys, TreeNodeModel, TreeProps,
        TreeStore, ValueMode, ViewChange, ViewFactory,
    };
    pub use crate::upload::{UploadEvent, UploadFile, UploadList, UploadStatus};
}
