//! Splices shortest paths between consecutive route stops.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::distance::DistanceOracle;
use crate::models::Route;

/// A route realized as graph edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedRoute {
    edges: Vec<(usize, usize)>,
    skipped: Vec<(usize, usize)>,
}

impl ExpandedRoute {
    /// Creates an expansion from its parts.
    pub fn new(edges: Vec<(usize, usize)>, skipped: Vec<(usize, usize)>) -> Self {
        Self { edges, skipped }
    }

    /// Edges in travel order, start depot to end depot.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Stop pairs whose shortest path could not be reconstructed.
    pub fn skipped_segments(&self) -> &[(usize, usize)] {
        &self.skipped
    }

    /// Returns `true` if every segment was reconstructed.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Distinct undirected edges of the path, each normalized to
    /// `(min, max)`.
    pub fn edge_set(&self) -> HashSet<(usize, usize)> {
        self.edges
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect()
    }
}

/// Turns waypoint sequences into contiguous edge paths.
///
/// A segment without a reconstructable path is recorded in
/// [`ExpandedRoute::skipped_segments`] and left out; the next segment then
/// starts from the last stop that was actually reached.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph, Route};
/// use depot_routes::distance::DistanceOracle;
/// use depot_routes::expansion::RouteExpander;
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 2.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 2.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// let expander = RouteExpander::new(&oracle, 0, 3);
///
/// let expanded = expander.expand(&Route::new(vec![1, 2]));
/// assert_eq!(expanded.edges(), &[(0, 1), (1, 2), (2, 3)]);
/// assert!(expanded.is_complete());
/// ```
pub struct RouteExpander<'a> {
    oracle: &'a DistanceOracle,
    start_depot: usize,
    end_depot: usize,
}

impl<'a> RouteExpander<'a> {
    /// Creates an expander for the given depots.
    pub fn new(oracle: &'a DistanceOracle, start_depot: usize, end_depot: usize) -> Self {
        Self {
            oracle,
            start_depot,
            end_depot,
        }
    }

    /// Expands start → waypoints → end into graph edges.
    pub fn expand(&self, route: &Route) -> ExpandedRoute {
        let mut edges = Vec::new();
        let mut skipped = Vec::new();
        let mut prev = self.start_depot;

        let stops = route
            .waypoints()
            .iter()
            .copied()
            .chain(std::iter::once(self.end_depot));
        for stop in stops {
            match self.oracle.path_edges(prev, stop) {
                Some(segment) => {
                    edges.extend(segment);
                    prev = stop;
                }
                None => {
                    warn!(from = prev, to = stop, "no path between stops, segment skipped");
                    skipped.push((prev, stop));
                }
            }
        }

        ExpandedRoute { edges, skipped }
    }
}
