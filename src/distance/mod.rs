//! Shortest-path distances over the input graph.
//!
//! Provides dense distance/predecessor matrices and the all-pairs
//! [`DistanceOracle`] that fills them.

mod matrix;
mod oracle;

pub use matrix::{DistanceMatrix, ParentMatrix};
pub use oracle::{dijkstra, DistanceOracle};
