//! Domain model types for depot-to-depot route construction.
//!
//! Provides the validated input graph, routes as ordered waypoint
//! sequences, directed savings, and the solver output.

mod graph;
mod route;
mod saving;
mod solution;

pub use graph::{Edge, Graph, Point};
pub use route::Route;
pub use saving::{sort_descending, DirectedSaving};
pub use solution::{PlannedRoute, Solution};
