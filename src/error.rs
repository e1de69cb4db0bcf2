//! Error types for sorting and order verification.

use thiserror::Error;

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;

/// Reasons a graph cannot be topologically sorted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    /// No graph was supplied.
    #[error("no graph supplied")]
    NullInput,

    /// An edge points outside `[0, len)`.
    #[error("node {node} has an edge to {target}, which is not a node of a {len}-node graph")]
    InvalidNode {
        /// Node whose adjacency entry holds the bad edge
        node: usize,
        /// The offending target as written in the input
        target: i128,
        /// Number of nodes in the graph
        len: usize,
    },

    /// Ordering stalled with unplaced nodes left; those nodes sit on or behind a cycle.
    #[error("cycle detected: {} node(s) could not be placed: {remaining:?}", .remaining.len())]
    CycleDetected {
        /// Unplaced node identifiers, ascending
        remaining: Vec<usize>,
    },
}

impl SortError {
    pub fn invalid_node(node: usize, target: i128, len: usize) -> Self {
        Self::InvalidNode { node, target, len }
    }

    pub fn cycle(remaining: Vec<usize>) -> Self {
        Self::CycleDetected { remaining }
    }

    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NullInput => "null_input",
            Self::InvalidNode { .. } => "invalid_node",
            Self::CycleDetected { .. } => "cycle_detected",
        }
    }
}

/// A supplied order that is not a topological order of its graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderViolation {
    #[error("order has {actual} entries but the graph has {expected} nodes")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("order mentions node {node}, which is not in the graph")]
    UnknownNode { node: usize },

    #[error("node {node} appears more than once in the order")]
    DuplicateNode { node: usize },

    #[error("edge {from} -> {to} is violated: {to} is placed before {from}")]
    EdgeViolated { from: usize, to: usize },
}

/// Errors from [`crate::verify_order`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error(transparent)]
    Graph(#[from] SortError),

    #[error(transparent)]
    Order(#[from] OrderViolation),
}
