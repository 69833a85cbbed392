//! Selection of structurally distinct routes.
//!
//! Two routes are compared by the Jaccard ratio of the undirected graph
//! edges their expanded paths traverse. A candidate is accepted only if its
//! similarity to every route accepted so far is at most
//! `1 - min_difference`.
//!
//! When the pool cannot supply enough such routes, selection degrades in
//! stages: weaker thresholds (each step halves the required difference),
//! then a fresh construction on a graph whose edges around already used
//! waypoints are penalized, then copies of accepted routes with one
//! waypoint dropped.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{rank_routes, top_routes};
use crate::constructive::RouteBuilder;
use crate::distance::DistanceOracle;
use crate::evaluation::RouteEvaluator;
use crate::expansion::{ExpandedRoute, RouteExpander};
use crate::models::{Graph, Route};
use crate::savings::{SavingsComputer, SavingsFormula, SignFilter};

/// How a route made it through selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Acceptance {
    /// Plain coverage/distance ranking, no diversity check.
    Ranked,
    /// Met the configured minimum difference.
    Strict,
    /// Met a relaxed minimum difference.
    Relaxed {
        /// The difference that was actually enforced.
        min_difference: f64,
    },
    /// Built by the penalized alternative-path search.
    AlternativePath,
    /// Copy of an accepted route with one waypoint removed.
    Perturbed,
}

/// A route chosen for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedRoute {
    /// The chosen route.
    pub route: Route,
    /// How it was accepted.
    pub acceptance: Acceptance,
}

/// Parameters of diversity-aware selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityConfig {
    /// Required difference `1 - jaccard` between any two accepted routes.
    pub min_difference: f64,
    /// Maximum candidates examined per pass and perturbations tried.
    pub max_attempts: usize,
    /// Number of halvings of `min_difference` tried before the
    /// alternative-path search, at most [`Self::MAX_RELAXATION_STEPS`].
    pub relaxation_steps: usize,
    /// Cost multiplier increment for edges touching used waypoints.
    pub node_penalty: f64,
    /// When `false`, only the strict threshold is applied and fewer routes
    /// than requested may be returned.
    pub allow_fallback: bool,
    /// Seed for choosing which waypoint a perturbation drops.
    pub seed: u64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            min_difference: 0.3,
            max_attempts: 1000,
            relaxation_steps: 2,
            node_penalty: 1.0,
            allow_fallback: true,
            seed: 42,
        }
    }
}

impl DiversityConfig {
    /// Largest number of relaxation steps applied.
    pub const MAX_RELAXATION_STEPS: usize = 32;

    /// Sets the required difference.
    pub fn with_min_difference(mut self, d: f64) -> Self {
        self.min_difference = d;
        self
    }

    /// Sets the per-pass attempt budget.
    pub fn with_max_attempts(mut self, n: usize) -> Self {
        self.max_attempts = n;
        self
    }

    /// Sets the number of relaxation steps.
    pub fn with_relaxation_steps(mut self, n: usize) -> Self {
        self.relaxation_steps = n;
        self
    }

    /// Sets the node penalty used by the alternative-path search.
    pub fn with_node_penalty(mut self, p: f64) -> Self {
        self.node_penalty = p;
        self
    }

    /// Enables or disables every fallback stage.
    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    /// Sets the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Relaxation steps actually applied.
    pub fn effective_relaxation_steps(&self) -> usize {
        self.relaxation_steps.min(Self::MAX_RELAXATION_STEPS)
    }

    /// Difference enforced at relaxation `step` (0 is the strict pass).
    pub fn relaxed_difference(&self, step: usize) -> f64 {
        let step = step.min(Self::MAX_RELAXATION_STEPS) as i32;
        self.min_difference / 2f64.powi(step)
    }

    /// Difference enforced after the last relaxation step.
    pub fn weakest_difference(&self) -> f64 {
        self.relaxed_difference(self.effective_relaxation_steps())
    }
}

/// Jaccard ratio `|a ∩ b| / |a ∪ b|`; two empty sets are identical.
pub fn jaccard_similarity(a: &HashSet<(usize, usize)>, b: &HashSet<(usize, usize)>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard similarity of the graph edges traversed by two expanded routes.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph, Route};
/// use depot_routes::distance::DistanceOracle;
/// use depot_routes::expansion::RouteExpander;
/// use depot_routes::selection::route_similarity;
///
/// // 0 - 1 - 2 - 3 - 4
/// let graph = Graph::new(5, vec![
///     Edge::new(0, 1, 1.0), Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 1.0), Edge::new(3, 4, 1.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// let expander = RouteExpander::new(&oracle, 0, 4);
///
/// // Both walk every edge of the line.
/// let a = expander.expand(&Route::new(vec![1, 3]));
/// let b = expander.expand(&Route::new(vec![1, 2, 3]));
/// assert_eq!(route_similarity(&a, &b), 1.0);
/// ```
pub fn route_similarity(a: &ExpandedRoute, b: &ExpandedRoute) -> f64 {
    jaccard_similarity(&a.edge_set(), &b.edge_set())
}

/// Accepted routes plus the edge sets of their expansions.
struct Accepted<'a> {
    expander: RouteExpander<'a>,
    routes: Vec<SelectedRoute>,
    edge_sets: Vec<HashSet<(usize, usize)>>,
}

impl<'a> Accepted<'a> {
    fn new(expander: RouteExpander<'a>) -> Self {
        Self {
            expander,
            routes: Vec::new(),
            edge_sets: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.routes.len()
    }

    fn contains(&self, route: &Route) -> bool {
        self.routes
            .iter()
            .any(|s| s.route.waypoints() == route.waypoints())
    }

    fn admits(&self, route: &Route, min_difference: f64) -> bool {
        if self.contains(route) {
            return false;
        }
        let edges = self.expander.expand(route).edge_set();
        let ceiling = 1.0 - min_difference;
        self.edge_sets
            .iter()
            .all(|accepted| jaccard_similarity(&edges, accepted) <= ceiling)
    }

    fn push(&mut self, route: Route, acceptance: Acceptance) {
        self.edge_sets.push(self.expander.expand(&route).edge_set());
        self.routes.push(SelectedRoute { route, acceptance });
    }
}

/// Picks up to `n` mutually different routes from a candidate pool.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph, Route};
/// use depot_routes::distance::DistanceOracle;
/// use depot_routes::selection::{DiversityConfig, DiversitySelector};
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 1.0), Edge::new(1, 3, 1.0),
///     Edge::new(0, 2, 1.0), Edge::new(2, 3, 1.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// let config = DiversityConfig::default().with_min_difference(0.5).with_fallback(false);
/// let selector = DiversitySelector::new(&graph, &oracle, config);
///
/// let mut a = Route::new(vec![1]);
/// a.set_total_distance(2.0);
/// let mut b = Route::new(vec![2]);
/// b.set_total_distance(2.0);
/// let picked = selector.select(&[a.clone(), a, b], 2);
/// assert_eq!(picked.len(), 2);
/// assert_eq!(picked[1].route.waypoints(), &[2]);
/// ```
pub struct DiversitySelector<'a> {
    graph: &'a Graph,
    oracle: &'a DistanceOracle,
    config: DiversityConfig,
    formula: SavingsFormula,
}

impl<'a> DiversitySelector<'a> {
    /// Creates a selector over the graph the pool was built on.
    pub fn new(graph: &'a Graph, oracle: &'a DistanceOracle, config: DiversityConfig) -> Self {
        Self {
            graph,
            oracle,
            config,
            formula: SavingsFormula::default(),
        }
    }

    /// Savings formula used by the alternative-path search.
    pub fn with_formula(mut self, formula: SavingsFormula) -> Self {
        self.formula = formula;
        self
    }

    /// Selects up to `n` routes, best first within each stage.
    pub fn select(&self, pool: &[Route], n: usize) -> Vec<SelectedRoute> {
        let expander = RouteExpander::new(
            self.oracle,
            self.graph.start_depot(),
            self.graph.end_depot(),
        );
        let mut accepted = Accepted::new(expander);
        if n == 0 {
            return Vec::new();
        }

        let ranked = top_routes(pool, pool.len());
        self.scan(&ranked, n, self.config.min_difference, Acceptance::Strict, &mut accepted);

        if accepted.len() < n && self.config.allow_fallback {
            for step in 1..=self.config.effective_relaxation_steps() {
                let min_difference = self.config.relaxed_difference(step);
                warn!(
                    accepted = accepted.len(),
                    requested = n,
                    min_difference,
                    "too few distinct routes, relaxing diversity threshold"
                );
                self.scan(
                    &ranked,
                    n,
                    min_difference,
                    Acceptance::Relaxed { min_difference },
                    &mut accepted,
                );
                if accepted.len() >= n {
                    break;
                }
            }
            if accepted.len() < n {
                self.alternative_paths(n, &mut accepted);
            }
            if accepted.len() < n {
                self.perturb(n, &mut accepted);
            }
        }

        if accepted.len() < n {
            warn!(accepted = accepted.len(), requested = n, "returning fewer routes than requested");
        }
        accepted.routes
    }

    fn scan(
        &self,
        ranked: &[Route],
        n: usize,
        min_difference: f64,
        acceptance: Acceptance,
        accepted: &mut Accepted<'_>,
    ) {
        for candidate in ranked.iter().take(self.config.max_attempts) {
            if accepted.len() >= n {
                break;
            }
            if accepted.admits(candidate, min_difference) {
                accepted.push(candidate.clone(), acceptance);
            }
        }
    }

    /// Rebuilds a tour on a graph that discourages already used waypoints.
    fn alternative_paths(&self, n: usize, accepted: &mut Accepted<'_>) {
        let start = self.graph.start_depot();
        let end = self.graph.end_depot();
        let customers = self.graph.waypoints();
        let evaluator = RouteEvaluator::new(self.oracle.distances(), start, end);
        let floor = self.config.weakest_difference();

        let mut round = 0usize;
        while accepted.len() < n && round < self.config.max_attempts {
            round += 1;
            let mut used = vec![false; self.graph.num_nodes()];
            for s in &accepted.routes {
                for &w in s.route.waypoints() {
                    if let Some(flag) = used.get_mut(w) {
                        *flag = true;
                    }
                }
            }
            let penalty = self.config.node_penalty * round as f64;
            let penalized = self.graph.with_node_penalty(&used, penalty);
            let oracle = DistanceOracle::build(&penalized);
            let savings = match SavingsComputer::new(self.formula, SignFilter::All)
                .compute(&penalized, oracle.distances())
            {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "alternative-path search unavailable");
                    return;
                }
            };

            let mut candidates: Vec<Route> = RouteBuilder::new(oracle.distances(), start, end)
                .build(&customers, &savings)
                .into_iter()
                .map(|mut r| {
                    evaluator.evaluate(&mut r);
                    r
                })
                .filter(Route::is_reachable)
                .collect();
            rank_routes(&mut candidates);

            match candidates.into_iter().find(|r| accepted.admits(r, floor)) {
                Some(route) => {
                    debug!(round, waypoints = route.len(), "accepted alternative-path route");
                    accepted.push(route, Acceptance::AlternativePath);
                }
                None => break,
            }
        }
    }

    /// Drops one waypoint from accepted routes until enough distinct routes
    /// exist or the attempt budget runs out.
    fn perturb(&self, n: usize, accepted: &mut Accepted<'_>) {
        let evaluator = RouteEvaluator::new(
            self.oracle.distances(),
            self.graph.start_depot(),
            self.graph.end_depot(),
        );
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        for attempt in 0..self.config.max_attempts {
            if accepted.len() >= n {
                break;
            }
            let sources: Vec<usize> = (0..accepted.len())
                .filter(|&i| accepted.routes[i].route.len() >= 2)
                .collect();
            if sources.is_empty() {
                break;
            }
            let source = &accepted.routes[sources[attempt % sources.len()]].route;
            let mut candidate = source.clone();
            let dropped = rng.random_range(0..candidate.len());
            candidate.remove(dropped);
            evaluator.evaluate(&mut candidate);
            if candidate.is_reachable() && !accepted.contains(&candidate) {
                accepted.push(candidate, Acceptance::Perturbed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edge;

    /// Three corridors 0 -> {1,2} -> 7, 0 -> {3,4} -> 7, 0 -> {5,6} -> 7,
    /// plus a cross link 2 - 3.
    fn corridors() -> Graph {
        Graph::new(
            8,
            vec![
                Edge::new(0, 1, 1.0),
                Edge::new(1, 2, 1.0),
                Edge::new(2, 7, 1.0),
                Edge::new(0, 3, 1.0),
                Edge::new(3, 4, 1.0),
                Edge::new(4, 7, 1.0),
                Edge::new(0, 5, 1.0),
                Edge::new(5, 6, 1.0),
                Edge::new(6, 7, 1.0),
                Edge::new(2, 3, 1.5),
            ],
        )
        .expect("valid graph")
    }

    /// 0 - 1 - 2 - 3 - 4 with unit edges.
    fn line() -> Graph {
        Graph::new(
            5,
            vec![
                Edge::new(0, 1, 1.0),
                Edge::new(1, 2, 1.0),
                Edge::new(2, 3, 1.0),
                Edge::new(3, 4, 1.0),
            ],
        )
        .expect("valid graph")
    }

    fn costed(g: &Graph, o: &DistanceOracle, waypoints: Vec<usize>) -> Route {
        RouteEvaluator::new(o.distances(), g.start_depot(), g.end_depot()).build_route(&waypoints)
    }

    fn assert_pairwise_bound(g: &Graph, o: &DistanceOracle, selected: &[SelectedRoute], min_difference: f64) {
        let expander = RouteExpander::new(o, g.start_depot(), g.end_depot());
        for (i, a) in selected.iter().enumerate() {
            for b in &selected[i + 1..] {
                let sim = route_similarity(&expander.expand(&a.route), &expander.expand(&b.route));
                assert!(sim <= 1.0 - min_difference, "similarity {sim}");
            }
        }
    }

    #[test]
    fn test_jaccard_basics() {
        let a: HashSet<(usize, usize)> = [(0, 1), (1, 2)].into_iter().collect();
        let b: HashSet<(usize, usize)> = [(0, 1), (1, 3)].into_iter().collect();
        assert!((jaccard_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(jaccard_similarity(&a, &a), 1.0);
        assert_eq!(jaccard_similarity(&HashSet::new(), &HashSet::new()), 1.0);
    }

    #[test]
    fn test_reordered_waypoints_on_same_corridor_are_identical() {
        let g = corridors();
        let o = DistanceOracle::build(&g);
        let expander = RouteExpander::new(&o, 0, 7);
        // [2, 1] walks 0-1-2, back to 1, then 1-2-7.
        let a = expander.expand(&Route::new(vec![1, 2]));
        let b = expander.expand(&Route::new(vec![2, 1]));
        assert_eq!(route_similarity(&a, &b), 1.0);
    }

    #[test]
    fn test_same_physical_path_is_rejected() {
        let g = line();
        let o = DistanceOracle::build(&g);
        let pool = vec![costed(&g, &o, vec![1, 2, 3]), costed(&g, &o, vec![1, 3])];
        let cfg = DiversityConfig::default().with_min_difference(0.5).with_fallback(false);
        let picked = DiversitySelector::new(&g, &o, cfg).select(&pool, 2);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].route.waypoints(), &[1, 2, 3]);
    }

    #[test]
    fn test_strict_selection_skips_near_duplicates() {
        let g = corridors();
        let o = DistanceOracle::build(&g);
        let pool = vec![
            costed(&g, &o, vec![1, 2]),
            costed(&g, &o, vec![1, 2]),
            costed(&g, &o, vec![1, 2, 3]),
            costed(&g, &o, vec![3, 4]),
            costed(&g, &o, vec![5, 6]),
        ];
        // [1, 2, 3] walks {0-1, 1-2, 2-3, 3-4, 4-7}; [1, 2] and [3, 4] each
        // share 2 of 6 edges with it.
        let cfg = DiversityConfig::default().with_min_difference(0.7).with_fallback(false);
        let picked = DiversitySelector::new(&g, &o, cfg).select(&pool, 3);
        let seqs: Vec<Vec<usize>> = picked.iter().map(|s| s.route.waypoints().to_vec()).collect();
        assert_eq!(seqs, vec![vec![1, 2, 3], vec![5, 6]]);
        assert!(picked.iter().all(|s| s.acceptance == Acceptance::Strict));
        assert_pairwise_bound(&g, &o, &picked, 0.7);
    }

    #[test]
    fn test_relaxed_threshold_fills_shortfall() {
        let g = corridors();
        let o = DistanceOracle::build(&g);
        let pool = vec![costed(&g, &o, vec![1, 2, 3]), costed(&g, &o, vec![1, 2])];
        // 2 shared edges out of 6: similarity 1/3
        let cfg = DiversityConfig::default()
            .with_min_difference(0.8)
            .with_relaxation_steps(1);
        let picked = DiversitySelector::new(&g, &o, cfg).select(&pool, 2);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].acceptance, Acceptance::Strict);
        assert_eq!(picked[1].acceptance, Acceptance::Relaxed { min_difference: 0.4 });
    }

    #[test]
    fn test_alternative_path_avoids_used_waypoints() {
        let g = corridors();
        let o = DistanceOracle::build(&g);
        let pool = vec![costed(&g, &o, vec![1, 2, 3, 4, 5, 6])];
        let cfg = DiversityConfig::default().with_min_difference(0.5).with_relaxation_steps(0);
        let picked = DiversitySelector::new(&g, &o, cfg).select(&pool, 2);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[1].route.waypoints(), picked[0].route.waypoints());
        assert!(matches!(
            picked[1].acceptance,
            Acceptance::AlternativePath | Acceptance::Perturbed
        ));
        assert!(picked[1].route.is_reachable());
    }

    #[test]
    fn test_perturbation_drops_a_waypoint() {
        // Every route on a line walks all of its edges, so only
        // perturbation can add a second route.
        let g = line();
        let o = DistanceOracle::build(&g);
        let route = costed(&g, &o, vec![1, 2, 3]);
        let cfg = DiversityConfig::default().with_min_difference(0.9);
        let picked = DiversitySelector::new(&g, &o, cfg).select(&[route], 2);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[1].acceptance, Acceptance::Perturbed);
        let w = picked[1].route.waypoints();
        assert_eq!(w.len(), 2);
        assert!(w[0] < w[1] && w.iter().all(|v| [1, 2, 3].contains(v)));
        assert!((picked[1].route.total_distance() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_perturbation_of_two_waypoint_route() {
        let g = line();
        let o = DistanceOracle::build(&g);
        let route = costed(&g, &o, vec![1, 3]);
        let picked = DiversitySelector::new(&g, &o, DiversityConfig::default()).select(&[route], 2);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[1].acceptance, Acceptance::Perturbed);
        assert_eq!(picked[1].route.len(), 1);
    }

    #[test]
    fn test_relaxation_steps_are_capped() {
        let cfg = DiversityConfig::default().with_relaxation_steps(usize::MAX);
        assert_eq!(cfg.effective_relaxation_steps(), DiversityConfig::MAX_RELAXATION_STEPS);
        let weakest = cfg.weakest_difference();
        assert!(weakest > 0.0 && weakest < 1e-9);

        let g = corridors();
        let o = DistanceOracle::build(&g);
        let pool = vec![costed(&g, &o, vec![1, 2]), costed(&g, &o, vec![1, 2])];
        let picked = DiversitySelector::new(&g, &o, cfg).select(&pool, 3);
        assert!(!picked.is_empty() && picked.len() <= 3);
    }

    #[test]
    fn test_no_fallback_may_return_fewer() {
        let g = corridors();
        let o = DistanceOracle::build(&g);
        let pool = vec![costed(&g, &o, vec![1, 2]), costed(&g, &o, vec![1, 2])];
        let cfg = DiversityConfig::default().with_fallback(false);
        let picked = DiversitySelector::new(&g, &o, cfg).select(&pool, 3);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_zero_requested() {
        let g = corridors();
        let o = DistanceOracle::build(&g);
        let pool = vec![costed(&g, &o, vec![1, 2])];
        let picked = DiversitySelector::new(&g, &o, DiversityConfig::default()).select(&pool, 0);
        assert!(picked.is_empty());
    }
}
