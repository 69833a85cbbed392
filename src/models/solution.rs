//! Solver output: selected routes with their expanded edge paths.

use serde::{Deserialize, Serialize};

use super::Route;
use crate::expansion::ExpandedRoute;
use crate::selection::Acceptance;

/// A selected route together with its realization on the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRoute {
    /// The waypoint sequence and its total distance.
    pub route: Route,
    /// Graph edges realizing depot → waypoints → depot.
    pub expansion: ExpandedRoute,
    /// How the route passed selection.
    pub acceptance: Acceptance,
}

/// The result of one solve: zero or more planned routes, best first.
///
/// # Examples
///
/// ```
/// use depot_routes::models::Solution;
///
/// let sol = Solution::empty();
/// assert!(sol.is_empty());
/// assert_eq!(sol.num_routes(), 0);
/// assert!(sol.edge_paths().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<PlannedRoute>,
}

impl Solution {
    /// Creates a solution with no routes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a planned route.
    pub fn add_route(&mut self, planned: PlannedRoute) {
        self.routes.push(planned);
    }

    /// Planned routes in selection order.
    pub fn routes(&self) -> &[PlannedRoute] {
        &self.routes
    }

    /// Number of planned routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if nothing was planned.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The first (best) planned route.
    pub fn best(&self) -> Option<&PlannedRoute> {
        self.routes.first()
    }

    /// One `(node, node)` edge sequence per route, depot to depot.
    pub fn edge_paths(&self) -> Vec<Vec<(usize, usize)>> {
        self.routes
            .iter()
            .map(|p| p.expansion.edges().to_vec())
            .collect()
    }

    /// Sum of route distances.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|p| p.route.total_distance()).sum()
    }
}
