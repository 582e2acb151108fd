//! Error types for graph searches.

use thiserror::Error;

/// Result alias used across conduit-graph.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors raised before a search starts.
///
/// A search that runs to completion never fails: an unreachable destination
/// is reported through the result (infinite cost, no path), not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GraphError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
