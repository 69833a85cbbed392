//! Directed savings for every ordered waypoint pair.
//!
//! # Formulas
//!
//! With start depot `s`, end depot `e`, and shortest-path distance `d`:
//!
//! ```text
//! SeparateDepot: v(i, j) = d(i, e) + d(s, j) - d(i, j)
//! SwappedDepot:  v(i, j) = d(s, i) + d(j, e) - d(i, j)
//! Euclidean:     v(i, j) = |s - i| + |s - j| - c(i, j)
//! ```
//!
//! where `|a - b|` is the straight-line distance between node coordinates
//! and `c(i, j)` the cost of the direct edge `i - j`.
//!
//! # Complexity
//!
//! O(w² log w) for `w` waypoints (dominated by sorting).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::RoutingError;
use crate::models::{sort_descending, DirectedSaving, Graph, Point};

/// How the saving of linking waypoint `i` to waypoint `j` is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SavingsFormula {
    /// `d(i, end) + d(start, j) - d(i, j)` on shortest-path distances.
    #[default]
    SeparateDepot,
    /// `d(start, i) + d(j, end) - d(i, j)` on shortest-path distances.
    SwappedDepot,
    /// `|start - i| + |start - j| - edge(i, j)` on node coordinates and the
    /// direct edge cost. Pairs without a direct edge are skipped.
    Euclidean,
}

/// Which savings survive into the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignFilter {
    /// Only strictly positive savings (beneficial merges).
    #[default]
    PositiveOnly,
    /// Every finite saving, regardless of sign.
    All,
}

impl SignFilter {
    fn admits(self, value: f64) -> bool {
        match self {
            SignFilter::PositiveOnly => value > 0.0,
            SignFilter::All => true,
        }
    }
}

/// Computes the sorted savings list for a graph.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph};
/// use depot_routes::distance::DistanceOracle;
/// use depot_routes::savings::{SavingsComputer, SavingsFormula, SignFilter};
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 2.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 2.0),
///     Edge::new(0, 2, 5.0),
///     Edge::new(1, 3, 5.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// let savings = SavingsComputer::new(SavingsFormula::SeparateDepot, SignFilter::PositiveOnly)
///     .compute(&graph, oracle.distances())
///     .unwrap();
/// assert_eq!((savings[0].from, savings[0].to, savings[0].value), (1, 2, 5.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SavingsComputer {
    formula: SavingsFormula,
    sign_filter: SignFilter,
}

impl SavingsComputer {
    /// Creates a computer for the given formula and filter.
    pub fn new(formula: SavingsFormula, sign_filter: SignFilter) -> Self {
        Self {
            formula,
            sign_filter,
        }
    }

    /// Selected formula.
    pub fn formula(&self) -> SavingsFormula {
        self.formula
    }

    /// Selected sign filter.
    pub fn sign_filter(&self) -> SignFilter {
        self.sign_filter
    }

    /// Returns savings for every ordered pair of distinct waypoints,
    /// sorted descending by value with ties kept in pair order.
    ///
    /// Pairs whose value involves an unreachable distance are excluded.
    /// Fails only when [`SavingsFormula::Euclidean`] is requested for a
    /// graph without coordinates.
    pub fn compute(
        &self,
        graph: &Graph,
        distances: &DistanceMatrix,
    ) -> Result<Vec<DirectedSaving>, RoutingError> {
        let points = match self.formula {
            SavingsFormula::Euclidean => {
                Some(graph.points().ok_or(RoutingError::MissingCoordinates)?)
            }
            _ => None,
        };

        let start = graph.start_depot();
        let end = graph.end_depot();
        let waypoints = graph.waypoints();
        let mut savings = Vec::with_capacity(waypoints.len() * waypoints.len().saturating_sub(1));

        for &i in &waypoints {
            for &j in &waypoints {
                if i == j {
                    continue;
                }
                let value = match self.formula {
                    SavingsFormula::SeparateDepot => {
                        distances.get(i, end) + distances.get(start, j) - distances.get(i, j)
                    }
                    SavingsFormula::SwappedDepot => {
                        distances.get(start, i) + distances.get(j, end) - distances.get(i, j)
                    }
                    SavingsFormula::Euclidean => {
                        match points.and_then(|p| euclidean_saving(graph, p, start, i, j)) {
                            Some(v) => v,
                            None => continue,
                        }
                    }
                };
                // Any infinite input leg yields a non-finite value.
                if !value.is_finite() {
                    continue;
                }
                if self.sign_filter.admits(value) {
                    savings.push(DirectedSaving::new(i, j, value));
                }
            }
        }

        sort_descending(&mut savings);
        debug!(
            formula = ?self.formula,
            sign_filter = ?self.sign_filter,
            count = savings.len(),
            "computed savings"
        );
        Ok(savings)
    }
}

fn euclidean_saving(graph: &Graph, points: &[Point], start: usize, i: usize, j: usize) -> Option<f64> {
    let cost = graph.edge_cost(i, j)?;
    Some(points[start].distance_to(&points[i]) + points[start].distance_to(&points[j]) - cost)
}
