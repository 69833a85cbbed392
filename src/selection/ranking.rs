//! Coverage-first route ranking.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::Route;

/// Orders routes best first: more waypoints wins, then lower distance.
pub fn compare_routes(a: &Route, b: &Route) -> Ordering {
    b.len()
        .cmp(&a.len())
        .then_with(|| a.total_distance().total_cmp(&b.total_distance()))
}

/// Stable-sorts `routes` best first.
pub fn rank_routes(routes: &mut [Route]) {
    routes.sort_by(compare_routes);
}

/// The best route; the earliest one wins ties.
pub fn best_route(routes: &[Route]) -> Option<&Route> {
    routes.iter().min_by(|a, b| compare_routes(a, b))
}

/// Returns the best `n` distinct routes of `pool`, best first.
///
/// Routes with the same waypoint sequence count once.
///
/// # Examples
///
/// ```
/// use depot_routes::models::Route;
/// use depot_routes::selection::top_routes;
///
/// let mut short = Route::new(vec![1]);
/// short.set_total_distance(2.0);
/// let mut long = Route::new(vec![1, 2]);
/// long.set_total_distance(9.0);
///
/// let top = top_routes(&[short, long], 1);
/// assert_eq!(top[0].waypoints(), &[1, 2]);
/// ```
pub fn top_routes(pool: &[Route], n: usize) -> Vec<Route> {
    let mut ranked = pool.to_vec();
    rank_routes(&mut ranked);
    let mut seen = HashSet::new();
    ranked.retain(|r| seen.insert(r.waypoints().to_vec()));
    ranked.truncate(n);
    ranked
}
