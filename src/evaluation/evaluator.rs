//! Route evaluator for separate start and end depots.

use crate::distance::DistanceMatrix;
use crate::models::Route;

/// Computes route distances as start depot → waypoints → end depot over a
/// shortest-path distance matrix.
///
/// A route with any unreachable leg, or any stop outside the matrix,
/// evaluates to `f64::INFINITY`; an empty route evaluates to `0.0`.
///
/// # Examples
///
/// ```
/// use depot_routes::distance::DistanceMatrix;
/// use depot_routes::evaluation::RouteEvaluator;
///
/// let dm = DistanceMatrix::from_data(3, vec![
///     0.0, 2.0, 5.0,
///     2.0, 0.0, 3.0,
///     5.0, 3.0, 0.0,
/// ]).unwrap();
/// let evaluator = RouteEvaluator::new(&dm, 0, 2);
/// let route = evaluator.build_route(&[1]);
/// assert_eq!(route.total_distance(), 5.0);
/// ```
pub struct RouteEvaluator<'a> {
    distances: &'a DistanceMatrix,
    start_depot: usize,
    end_depot: usize,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates an evaluator for the given depots.
    pub fn new(distances: &'a DistanceMatrix, start_depot: usize, end_depot: usize) -> Self {
        Self {
            distances,
            start_depot,
            end_depot,
        }
    }

    /// Start depot index.
    pub fn start_depot(&self) -> usize {
        self.start_depot
    }

    /// End depot index.
    pub fn end_depot(&self) -> usize {
        self.end_depot
    }

    /// Distance of start → `waypoints` → end.
    pub fn route_distance(&self, waypoints: &[usize]) -> f64 {
        if waypoints.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        let mut prev = self.start_depot;
        for &w in waypoints.iter().chain(std::iter::once(&self.end_depot)) {
            let d = self.distances.get(prev, w);
            if d.is_infinite() {
                return f64::INFINITY;
            }
            total += d;
            prev = w;
        }
        total
    }

    /// Builds a route over `waypoints` with its distance filled in.
    pub fn build_route(&self, waypoints: &[usize]) -> Route {
        let mut route = Route::new(waypoints.to_vec());
        self.evaluate(&mut route);
        route
    }

    /// Recomputes and stores the distance of `route`.
    pub fn evaluate(&self, route: &mut Route) {
        let d = self.route_distance(route.waypoints());
        route.set_total_distance(d);
    }
}
