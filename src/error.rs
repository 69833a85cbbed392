//! Error type for input validation and solver configuration.

use std::fmt;

/// Errors raised at the boundary, before any route computation starts.
///
/// Conditions that occur during solving (unreachable pairs, segments that
/// cannot be reconstructed, an empty candidate pool) are not errors: they
/// surface as infinite distances, skipped segments, or empty results.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// An edge references a node index outside `0..num_nodes`.
    NodeOutOfRange {
        /// Position of the offending edge in the input list.
        edge_index: usize,
        /// The out-of-range node index.
        node: usize,
        /// Number of nodes in the graph.
        num_nodes: usize,
    },
    /// An edge carries a negative cost.
    NegativeCost {
        /// Position of the offending edge in the input list.
        edge_index: usize,
        /// The rejected cost.
        cost: f64,
    },
    /// An edge carries a NaN or infinite cost.
    NonFiniteCost {
        /// Position of the offending edge in the input list.
        edge_index: usize,
    },
    /// The number of coordinates does not match the number of nodes.
    PointCountMismatch {
        /// Number of nodes in the graph.
        expected: usize,
        /// Number of points supplied.
        found: usize,
    },
    /// The coordinate-based savings formula was selected for a graph
    /// without coordinates.
    MissingCoordinates,
    /// A configuration value is outside its valid range.
    InvalidConfig(String),
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingError::NodeOutOfRange {
                edge_index,
                node,
                num_nodes,
            } => write!(
                f,
                "edge #{edge_index} references node {node}, but the graph has {num_nodes} nodes"
            ),
            RoutingError::NegativeCost { edge_index, cost } => {
                write!(f, "edge #{edge_index} has negative cost {cost}")
            }
            RoutingError::NonFiniteCost { edge_index } => {
                write!(f, "edge #{edge_index} has a non-finite cost")
            }
            RoutingError::PointCountMismatch { expected, found } => {
                write!(f, "expected {expected} points, got {found}")
            }
            RoutingError::MissingCoordinates => {
                write!(f, "euclidean savings require node coordinates")
            }
            RoutingError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for RoutingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = RoutingError::NodeOutOfRange {
            edge_index: 2,
            node: 9,
            num_nodes: 4,
        };
        assert_eq!(
            e.to_string(),
            "edge #2 references node 9, but the graph has 4 nodes"
        );
        assert_eq!(
            RoutingError::NegativeCost {
                edge_index: 0,
                cost: -1.5
            }
            .to_string(),
            "edge #0 has negative cost -1.5"
        );
        assert!(RoutingError::MissingCoordinates
            .to_string()
            .contains("coordinates"));
    }
}
