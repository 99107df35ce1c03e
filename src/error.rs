/// Error types for tree lookups, tree mutations and host commands

use crate::tree::NodeId;

/// Errors raised while locating or restructuring nodes in a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No node in the tree carries this identifier.
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// The index path does not address a usable position.
    #[error("invalid index path {path:?}: {reason}")]
    InvalidPath {
        path: Vec<usize>,
        reason: &'static str,
    },
}

impl TreeError {
    pub(crate) fn invalid_path(path: &[usize], reason: &'static str) -> Self {
        TreeError::InvalidPath {
            path: path.to_vec(),
            reason,
        }
    }
}

/// Errors raised at the boundary with the browser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The browser rejected or failed a command. Never retried.
    #[error("{command} failed: {message}")]
    CommandFailure { command: String, message: String },

    /// Data handed over by the bridge could not be decoded.
    #[error("failed to decode host data: {0}")]
    Decode(String),
}
