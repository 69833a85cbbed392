//! End-to-end route solvers.
//!
//! - [`Solver`]: common interface for anything that turns a graph into routes
//! - [`SavingsSolver`]: shortest paths, savings, variants, selection, expansion
//! - [`SolverConfig`]: tunables for the savings pipeline

mod config;
mod savings_solver;

pub use config::{SelectionMode, SolverConfig};
pub use savings_solver::{solve_clarke_savings, SavingsSolver};

use crate::error::RoutingError;
use crate::models::{Graph, Solution};

/// A route construction strategy.
///
/// Node `0` is the start depot and node `num_nodes - 1` the end depot; all
/// other nodes are waypoints. Implementations return at most `n_of_roads`
/// routes, best first, and an empty solution when the graph has fewer than
/// three nodes.
pub trait Solver {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Builds up to `n_of_roads` start-to-end routes.
    fn solve(&self, graph: &Graph, n_of_roads: usize) -> Result<Solution, RoutingError>;
}
