//! Route type: an ordered waypoint sequence between two depots.

use serde::{Deserialize, Serialize};

/// An ordered sequence of distinct waypoints travelled from the start depot
/// to the end depot.
///
/// The depots themselves are not stored. `total_distance` is filled in by
/// [`RouteEvaluator`](crate::evaluation::RouteEvaluator) and is
/// `f64::INFINITY` when some leg is unreachable.
///
/// # Examples
///
/// ```
/// use depot_routes::models::Route;
///
/// let mut route = Route::singleton(1);
/// let mut tail = Route::singleton(2);
/// route.append(&mut tail);
/// assert_eq!(route.waypoints(), &[1, 2]);
/// assert!(tail.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    waypoints: Vec<usize>,
    total_distance: f64,
}

impl Route {
    /// Creates a route over the given waypoints with zero distance.
    pub fn new(waypoints: Vec<usize>) -> Self {
        Self {
            waypoints,
            total_distance: 0.0,
        }
    }

    /// Creates a single-waypoint route.
    pub fn singleton(waypoint: usize) -> Self {
        Self::new(vec![waypoint])
    }

    /// Waypoints in visit order.
    pub fn waypoints(&self) -> &[usize] {
        &self.waypoints
    }

    /// Number of waypoints covered.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if this route covers no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint, if any.
    pub fn first(&self) -> Option<usize> {
        self.waypoints.first().copied()
    }

    /// Last waypoint, if any.
    pub fn last(&self) -> Option<usize> {
        self.waypoints.last().copied()
    }

    /// Returns `true` if `waypoint` is on this route.
    pub fn contains(&self, waypoint: usize) -> bool {
        self.waypoints.contains(&waypoint)
    }

    /// Moves every waypoint of `other` to the end of this route, leaving
    /// `other` empty.
    pub fn append(&mut self, other: &mut Route) {
        self.waypoints.append(&mut other.waypoints);
        other.total_distance = 0.0;
    }

    /// Removes the waypoint at `index`, returning it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> usize {
        self.waypoints.remove(index)
    }

    /// Total travelled distance, depots included.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Sets the total distance (used by the evaluator).
    pub fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }

    /// Returns `true` if the total distance is finite.
    pub fn is_reachable(&self) -> bool {
        self.total_distance.is_finite()
    }
}
