//! # depot-routes
//!
//! Point-to-point route construction over weighted undirected graphs.
//! Routes leave a start depot, visit a subset of waypoints, and end at a
//! separate end depot.
//!
//! ## Modules
//!
//! - [`models`]: Graph, Route, DirectedSaving, Solution
//! - [`distance`]: All-pairs Dijkstra distances and path reconstruction
//! - [`evaluation`]: Route distance through shortest-path legs
//! - [`savings`]: Separate-depot savings lists
//! - [`constructive`]: Directed Clarke-Wright merging and randomized variants
//! - [`selection`]: Coverage/distance ranking and diversity-aware selection
//! - [`expansion`]: Waypoint routes to graph edge paths
//! - [`solver`]: The [`Solver`](solver::Solver) trait and the savings pipeline
//!
//! ## Example
//!
//! ```
//! use depot_routes::models::{Edge, Graph};
//! use depot_routes::solver::{SavingsSolver, Solver};
//!
//! let graph = Graph::new(4, vec![
//!     Edge::new(0, 1, 2.0),
//!     Edge::new(1, 2, 1.0),
//!     Edge::new(2, 3, 2.0),
//! ]).unwrap();
//!
//! let solution = SavingsSolver::default().solve(&graph, 2).unwrap();
//! assert_eq!(solution.edge_paths()[0], vec![(0, 1), (1, 2), (2, 3)]);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod expansion;
pub mod models;
pub mod savings;
pub mod selection;
pub mod solver;

pub use error::RoutingError;
