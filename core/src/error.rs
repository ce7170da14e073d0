//! Errors raised by graph construction and traversal.

/// Errors returned by [`Graph`](crate::Graph) mutation, traversal setup and
/// document loading.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node is not a member of the graph: {0}")]
    UnknownNode(String),

    #[error("edge key already present in the graph: {0}")]
    DuplicateEdge(String),

    #[error("edge {edge} has invalid length {length} (must be finite and non-negative)")]
    InvalidLength { edge: String, length: f64 },

    #[error("malformed graph document: {0}")]
    Document(#[from] serde_json::Error),
}

impl GraphError {
    /// True for caller mistakes about graph contents (as opposed to a
    /// malformed serialized document).
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, GraphError::Document(_))
    }

    pub(crate) fn unknown_node<N: std::fmt::Debug>(key: &N) -> Self {
        GraphError::UnknownNode(format!("{:?}", key))
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
