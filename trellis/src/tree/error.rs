//! Tree error types.

use thiserror::Error;

use super::value::NodeValue;

/// Errors returned by structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A node with this value already exists in the tree (or twice in the item).
    #[error("Node value '{0}' already exists in the tree")]
    DuplicateValue(NodeValue),

    /// Raw item data is not a JSON object.
    #[error("Invalid tree item: {0}")]
    InvalidItem(String),

    /// Attempted to move a node into its own subtree.
    #[error("Cannot move node '{0}' into its own subtree")]
    CyclicMove(NodeValue),
}

/// Error reported by a lazy `load` function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    /// Error message
    pub message: String,
}

impl LoadError {
    /// Create a new load error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LoadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}
