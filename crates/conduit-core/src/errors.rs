//! Error types for intent compilation.
//!
//! Every failure is fatal for the compilation that raised it: no partial
//! `LinkCollectionIntent` is ever returned. Retrying is the caller's business.

use conduit_graph::GraphError;
use thiserror::Error;

/// Result alias used across conduit-core.
pub type IntentResult<T> = Result<T, IntentError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    /// Malformed request or configuration; rejected before any search.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No ingress point could be connected to the egress point.
    #[error("no connectivity: {0}")]
    NoConnectivity(String),

    /// Some ingress points are unreachable and partial failure is not allowed.
    #[error("partial connectivity: {0}")]
    PartialConnectivity(String),

    /// Resources could not be reserved along the computed tree.
    #[error("resource allocation failed: {0}")]
    ResourceAllocation(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl IntentError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn no_connectivity(msg: impl Into<String>) -> Self {
        Self::NoConnectivity(msg.into())
    }

    pub fn partial_connectivity(msg: impl Into<String>) -> Self {
        Self::PartialConnectivity(msg.into())
    }

    pub fn resource_allocation(msg: impl Into<String>) -> Self {
        Self::ResourceAllocation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "intent.invalid_argument",
            Self::NoConnectivity(_) => "intent.no_connectivity",
            Self::PartialConnectivity(_) => "intent.partial_connectivity",
            Self::ResourceAllocation(_) => "intent.resource_allocation",
            Self::Graph(_) => "intent.graph",
            Self::Invariant(_) => "intent.invariant",
        }
    }
}
