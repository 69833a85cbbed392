//! Directed Clarke-Wright savings for separate start and end depots.
//!
//! # Algorithm
//!
//! Every customer starts on its own route (start → customer → end). The
//! savings list is then walked once, in the order given. For a saving
//! `(from, to)` the route currently ending with `from` is joined to the
//! route currently beginning with `to`, provided both exist, they are
//! different routes, and they share no customer. The second route is
//! emptied by the merge and never revived; a skipped saving is never
//! retried.
//!
//! Route membership is tracked through explicit handle tables
//! (`owner`, `head_of`, `tail_of`) updated together on every merge, so an
//! emptied route can no longer be reached through a stale entry.
//!
//! # Complexity
//!
//! O(s + n²) for `s` savings and `n` customers in the worst case
//! (handle updates on merge).
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use tracing::trace;

use crate::distance::DistanceMatrix;
use crate::evaluation::RouteEvaluator;
use crate::models::{DirectedSaving, Route};

/// Handle into the builder's route arena.
type RouteId = usize;

/// Merges singleton routes into chains following a savings ordering.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph, DirectedSaving};
/// use depot_routes::distance::DistanceOracle;
/// use depot_routes::constructive::RouteBuilder;
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 2.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 2.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// let builder = RouteBuilder::new(oracle.distances(), 0, 3);
///
/// let routes = builder.build(&[1, 2], &[DirectedSaving::new(1, 2, 5.0)]);
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].waypoints(), &[1, 2]);
/// assert_eq!(routes[0].total_distance(), 5.0);
/// ```
pub struct RouteBuilder<'a> {
    evaluator: RouteEvaluator<'a>,
    num_nodes: usize,
}

/// Mutable state of one construction pass.
struct MergeState {
    routes: Vec<Route>,
    owner: Vec<Option<RouteId>>,
    head_of: Vec<Option<RouteId>>,
    tail_of: Vec<Option<RouteId>>,
}

impl MergeState {
    fn new(num_nodes: usize, customers: &[usize]) -> Self {
        let mut state = Self {
            routes: Vec::with_capacity(customers.len()),
            owner: vec![None; num_nodes],
            head_of: vec![None; num_nodes],
            tail_of: vec![None; num_nodes],
        };
        for &c in customers {
            // Duplicates and out-of-range customers are ignored.
            if c >= num_nodes || state.owner[c].is_some() {
                continue;
            }
            let id = state.routes.len();
            state.routes.push(Route::singleton(c));
            state.owner[c] = Some(id);
            state.head_of[c] = Some(id);
            state.tail_of[c] = Some(id);
        }
        state
    }

    fn lookup(table: &[Option<RouteId>], node: usize) -> Option<RouteId> {
        table.get(node).copied().flatten()
    }

    fn overlaps(&self, r1: RouteId, r2: RouteId) -> bool {
        self.routes[r2]
            .waypoints()
            .iter()
            .any(|&w| self.owner[w] == Some(r1))
    }

    /// Tries to apply `saving`; returns `true` on merge.
    fn apply(&mut self, saving: &DirectedSaving) -> bool {
        let (Some(r1), Some(r2)) = (
            Self::lookup(&self.tail_of, saving.from),
            Self::lookup(&self.head_of, saving.to),
        ) else {
            return false;
        };
        if r1 == r2 || self.overlaps(r1, r2) {
            return false;
        }

        let mut absorbed = std::mem::replace(&mut self.routes[r2], Route::new(Vec::new()));
        for &w in absorbed.waypoints() {
            self.owner[w] = Some(r1);
        }
        self.tail_of[saving.from] = None;
        self.head_of[saving.to] = None;
        if let Some(new_tail) = absorbed.last() {
            self.tail_of[new_tail] = Some(r1);
        }
        self.routes[r1].append(&mut absorbed);
        true
    }
}

impl<'a> RouteBuilder<'a> {
    /// Creates a builder over a shortest-path distance matrix.
    pub fn new(distances: &'a DistanceMatrix, start_depot: usize, end_depot: usize) -> Self {
        Self {
            evaluator: RouteEvaluator::new(distances, start_depot, end_depot),
            num_nodes: distances.size(),
        }
    }

    /// The evaluator used to cost finished routes.
    pub fn evaluator(&self) -> &RouteEvaluator<'a> {
        &self.evaluator
    }

    /// Builds routes from `customers` by applying `savings` in order.
    ///
    /// The savings list is used as given; sort it beforehand for the
    /// classic greedy behavior. Every surviving non-empty route is returned
    /// with its distance computed, in the order of its first customer's
    /// position in `customers`. Routes with an unreachable leg carry an
    /// infinite distance and are still returned.
    pub fn build(&self, customers: &[usize], savings: &[DirectedSaving]) -> Vec<Route> {
        if customers.is_empty() {
            return Vec::new();
        }

        let mut state = MergeState::new(self.num_nodes, customers);
        let mut merges = 0usize;
        for saving in savings {
            if state.apply(saving) {
                merges += 1;
            }
        }
        trace!(customers = customers.len(), merges, "route construction pass");

        state
            .routes
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|mut r| {
                self.evaluator.evaluate(&mut r);
                r
            })
            .collect()
    }
}
