/*!
# Errors

All fallible engine operations return [`GraphResult`]. Every variant of [`GraphError`] is a
local contract violation that is reported to the caller immediately; there is no transient
error class. Operations that legitimately find nothing (no isomorphism, no further subgraph)
return `None`/`false` instead.
*/

use thiserror::Error;

use crate::node::*;

/// Shorthand for results of fallible graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Coarse classification of a [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter violated the operation's contract
    InvalidArgument,
    /// The receiver cannot represent the requested mutation
    UnsupportedOperation,
    /// The graph changed structurally while an enumeration was in progress
    StaleIteration,
    /// A search was stopped by its [`SearchLimits`](crate::algo::SearchLimits)
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("{0} is not a valid vertex id")]
    InvalidVertex(Node),

    #[error("vertex {0} is not present in the graph")]
    UnknownVertex(Node),

    #[error("subgraph size must be between 1 and the graph order {order}, got {size}")]
    InvalidSubgraphSize { size: usize, order: NumNodes },

    #[error("expected one sampling probability per depth ({expected}), got {actual}")]
    ProbabilityCount { expected: usize, actual: usize },

    #[error("sampling probability {value} at depth {depth} is outside of (0, 1]")]
    InvalidProbability { depth: usize, value: f64 },

    #[error("occurrence count must be positive")]
    InvalidCount,

    #[error("must shuffle each edge at least once")]
    InvalidShuffleCount,

    #[error("a typed subgraph needs at least one edge type")]
    EmptyTypeSet,

    #[error("edge type {0} is not present in the graph")]
    UnknownEdgeType(String),

    #[error("edge {0} cannot be stored in this graph")]
    UnsupportedEdge(String),

    #[error("vertex {0} lies outside of the subgraph")]
    OutsideSubgraph(Node),

    #[error("edge type {0} is not valid in this subgraph")]
    UnsupportedEdgeType(String),

    #[error("graph was structurally modified during iteration")]
    StaleIteration,

    #[error("search was interrupted after exploring {0} states")]
    Interrupted(u64),

    #[error("no vertex id left to allocate")]
    VertexSpaceExhausted,
}

impl GraphError {
    /// Returns the class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidVertex(_)
            | Self::UnknownVertex(_)
            | Self::InvalidSubgraphSize { .. }
            | Self::ProbabilityCount { .. }
            | Self::InvalidProbability { .. }
            | Self::InvalidCount
            | Self::InvalidShuffleCount
            | Self::EmptyTypeSet
            | Self::UnknownEdgeType(_) => ErrorKind::InvalidArgument,
            Self::UnsupportedEdge(_)
            | Self::OutsideSubgraph(_)
            | Self::UnsupportedEdgeType(_)
            | Self::VertexSpaceExhausted => ErrorKind::UnsupportedOperation,
            Self::StaleIteration => ErrorKind::StaleIteration,
            Self::Interrupted(_) => ErrorKind::Interrupted,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(GraphError::UnknownVertex(3).kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            GraphError::InvalidProbability {
                depth: 1,
                value: 1.5
            }
            .kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            GraphError::UnsupportedEdgeType("x".into()).kind(),
            ErrorKind::UnsupportedOperation
        );
        assert_eq!(GraphError::StaleIteration.kind(), ErrorKind::StaleIteration);
    }

    #[test]
    fn messages_name_the_offender() {
        let msg = GraphError::InvalidSubgraphSize { size: 5, order: 3 }.to_string();
        assert!(msg.contains('5') && msg.contains('3'));
        assert_eq!(
            GraphError::UnknownVertex(42).to_string(),
            "vertex 42 is not present in the graph"
        );
    }
}
