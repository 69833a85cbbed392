//! Randomized re-runs of the savings construction.
//!
//! The greedy merge never backtracks, so a single pass can lock itself
//! into a poor chain. Re-running it over perturbed savings orderings
//! yields a pool of alternative routes to select from.
//!
//! Each variant `k` owns a fresh generator seeded with `seed + k`; no
//! generator is shared between variants, so a fixed seed reproduces the
//! exact same pool.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::RouteBuilder;
use crate::models::{DirectedSaving, Route};
use crate::selection::best_route;

/// How savings orderings are perturbed between variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum ShuffleMode {
    /// Shuffle the whole list; keep every finite route of every variant.
    #[default]
    Full,
    /// Shuffle only the leading `fraction` of the list, keeping the weaker
    /// savings in order; keep the best route of each variant and stop once
    /// the requested number of routes is pooled.
    Partial {
        /// Share of the list, from the top, that is shuffled.
        fraction: f64,
        /// Only accept a variant that produced a single route covering
        /// every customer.
        require_full_coverage: bool,
    },
    /// No randomization: one pass over the list as given. Intended for the
    /// sign-agnostic savings list, to obtain one maximal-coverage tour.
    Exhaustive,
}

impl ShuffleMode {
    /// Partial shuffle of the top fifth without a coverage requirement.
    pub fn partial() -> Self {
        ShuffleMode::Partial {
            fraction: 0.2,
            require_full_coverage: false,
        }
    }
}

/// Produces a candidate route pool from `variants` perturbed savings
/// orderings.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph};
/// use depot_routes::distance::DistanceOracle;
/// use depot_routes::savings::SavingsComputer;
/// use depot_routes::constructive::{RouteBuilder, ShuffleMode, VariantGenerator};
///
/// let graph = Graph::new(5, vec![
///     Edge::new(0, 1, 1.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 1.0),
///     Edge::new(3, 4, 1.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// let savings = SavingsComputer::default().compute(&graph, oracle.distances()).unwrap();
/// let builder = RouteBuilder::new(oracle.distances(), 0, 4);
///
/// let generator = VariantGenerator::new(ShuffleMode::Full, 4).with_seed(7);
/// let pool = generator.generate(&builder, &graph.waypoints(), &savings);
/// assert!(!pool.is_empty());
/// assert_eq!(pool, generator.generate(&builder, &graph.waypoints(), &savings));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantGenerator {
    mode: ShuffleMode,
    variants: usize,
    seed: u64,
    max_attempts: Option<usize>,
}

impl VariantGenerator {
    /// Default base seed.
    pub const DEFAULT_SEED: u64 = 42;

    /// Creates a generator for `variants` orderings with the default seed.
    pub fn new(mode: ShuffleMode, variants: usize) -> Self {
        Self {
            mode,
            variants,
            seed: Self::DEFAULT_SEED,
            max_attempts: None,
        }
    }

    /// Sets the base seed; variant `k` uses `seed + k`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Caps the number of variants tried in partial mode. Defaults to the
    /// requested variant count.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Shuffle mode.
    pub fn mode(&self) -> ShuffleMode {
        self.mode
    }

    /// Requested number of variants.
    pub fn variants(&self) -> usize {
        self.variants
    }

    /// Base seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates the pool using [`StdRng`] per variant.
    pub fn generate(
        &self,
        builder: &RouteBuilder<'_>,
        customers: &[usize],
        savings: &[DirectedSaving],
    ) -> Vec<Route> {
        self.generate_with::<StdRng>(builder, customers, savings)
    }

    /// Generates the pool with a caller-chosen generator type, seeded per
    /// variant through [`SeedableRng::seed_from_u64`].
    ///
    /// Only non-empty routes with a finite distance enter the pool.
    pub fn generate_with<R: Rng + SeedableRng>(
        &self,
        builder: &RouteBuilder<'_>,
        customers: &[usize],
        savings: &[DirectedSaving],
    ) -> Vec<Route> {
        let pool = match self.mode {
            ShuffleMode::Full => self.full::<R>(builder, customers, savings),
            ShuffleMode::Partial {
                fraction,
                require_full_coverage,
            } => self.partial::<R>(builder, customers, savings, fraction, require_full_coverage),
            ShuffleMode::Exhaustive => builder
                .build(customers, savings)
                .into_iter()
                .filter(is_candidate)
                .collect(),
        };
        debug!(mode = ?self.mode, variants = self.variants, pool = pool.len(), "generated route variants");
        pool
    }

    fn rng_for<R: SeedableRng>(&self, variant: usize) -> R {
        R::seed_from_u64(self.seed.wrapping_add(variant as u64))
    }

    fn full<R: Rng + SeedableRng>(
        &self,
        builder: &RouteBuilder<'_>,
        customers: &[usize],
        savings: &[DirectedSaving],
    ) -> Vec<Route> {
        let mut pool = Vec::new();
        let mut ordering = savings.to_vec();
        for k in 0..self.variants {
            let mut rng: R = self.rng_for(k);
            ordering.copy_from_slice(savings);
            ordering.shuffle(&mut rng);
            pool.extend(builder.build(customers, &ordering).into_iter().filter(is_candidate));
        }
        pool
    }

    fn partial<R: Rng + SeedableRng>(
        &self,
        builder: &RouteBuilder<'_>,
        customers: &[usize],
        savings: &[DirectedSaving],
        fraction: f64,
        require_full_coverage: bool,
    ) -> Vec<Route> {
        let prefix = ((savings.len() as f64) * fraction.clamp(0.0, 1.0)).floor() as usize;
        let attempts = self.max_attempts.unwrap_or(self.variants);
        let mut pool = Vec::new();
        let mut ordering = savings.to_vec();

        for k in 0..attempts {
            if pool.len() >= self.variants {
                break;
            }
            ordering.copy_from_slice(savings);
            if prefix > 1 {
                let mut rng: R = self.rng_for(k);
                ordering[..prefix].shuffle(&mut rng);
            }
            let routes: Vec<Route> = builder
                .build(customers, &ordering)
                .into_iter()
                .filter(is_candidate)
                .collect();

            if require_full_coverage {
                if let [only] = routes.as_slice() {
                    if only.len() == customers.len() {
                        pool.push(only.clone());
                    }
                }
            } else if let Some(best) = best_route(&routes) {
                pool.push(best.clone());
            }
        }
        pool
    }
}

fn is_candidate(route: &Route) -> bool {
    !route.is_empty() && route.is_reachable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceOracle;
    use crate::models::{Edge, Graph};
    use crate::savings::{SavingsComputer, SavingsFormula, SignFilter};
    use rand::rngs::SmallRng;

    /// Two parallel corridors between the depots with rungs in between.
    fn ladder() -> Graph {
        Graph::new(
            8,
            vec![
                Edge::new(0, 1, 1.0),
                Edge::new(1, 2, 1.0),
                Edge::new(2, 3, 1.0),
                Edge::new(3, 7, 1.0),
                Edge::new(0, 4, 1.0),
                Edge::new(4, 5, 1.0),
                Edge::new(5, 6, 1.0),
                Edge::new(6, 7, 1.0),
                Edge::new(1, 4, 1.5),
                Edge::new(2, 5, 1.5),
                Edge::new(3, 6, 1.5),
            ],
        )
        .expect("valid graph")
    }

    fn setup(filter: SignFilter) -> (Graph, DistanceOracle, Vec<DirectedSaving>) {
        let g = ladder();
        let o = DistanceOracle::build(&g);
        let s = SavingsComputer::new(SavingsFormula::SeparateDepot, filter)
            .compute(&g, o.distances())
            .expect("ok");
        (g, o, s)
    }

    fn assert_well_formed(route: &Route, g: &Graph) {
        let mut seen = vec![false; g.num_nodes()];
        for &w in route.waypoints() {
            assert!(w != g.start_depot() && w != g.end_depot());
            assert!(!seen[w], "waypoint {w} repeated");
            seen[w] = true;
        }
    }

    #[test]
    fn test_full_is_deterministic() {
        let (g, o, s) = setup(SignFilter::PositiveOnly);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let gen = VariantGenerator::new(ShuffleMode::Full, 10).with_seed(3);
        let a = gen.generate(&b, &g.waypoints(), &s);
        let c = gen.generate(&b, &g.waypoints(), &s);
        assert_eq!(a, c);
        assert!(!a.is_empty());
        for r in &a {
            assert_well_formed(r, &g);
            assert!(r.is_reachable());
        }
    }

    #[test]
    fn test_injected_rng_is_deterministic() {
        let (g, o, s) = setup(SignFilter::PositiveOnly);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let gen = VariantGenerator::new(ShuffleMode::Full, 6).with_seed(11);
        let a = gen.generate_with::<SmallRng>(&b, &g.waypoints(), &s);
        let c = gen.generate_with::<SmallRng>(&b, &g.waypoints(), &s);
        assert_eq!(a, c);
    }

    #[test]
    fn test_full_covers_each_customer_once_per_variant() {
        let (g, o, s) = setup(SignFilter::PositiveOnly);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let gen = VariantGenerator::new(ShuffleMode::Full, 1);
        let pool = gen.generate(&b, &g.waypoints(), &s);
        let mut all: Vec<usize> = pool.iter().flat_map(|r| r.waypoints().to_vec()).collect();
        all.sort_unstable();
        assert_eq!(all, g.waypoints());
    }

    #[test]
    fn test_zero_variants_is_empty() {
        let (g, o, s) = setup(SignFilter::PositiveOnly);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        for mode in [ShuffleMode::Full, ShuffleMode::partial()] {
            let gen = VariantGenerator::new(mode, 0);
            assert!(gen.generate(&b, &g.waypoints(), &s).is_empty());
        }
    }

    #[test]
    fn test_partial_keeps_one_route_per_variant() {
        let (g, o, s) = setup(SignFilter::PositiveOnly);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let gen = VariantGenerator::new(ShuffleMode::partial(), 5);
        let pool = gen.generate(&b, &g.waypoints(), &s);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool, gen.generate(&b, &g.waypoints(), &s));
    }

    #[test]
    fn test_partial_stops_at_requested_count() {
        let (g, o, s) = setup(SignFilter::PositiveOnly);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let gen = VariantGenerator::new(ShuffleMode::partial(), 2).with_max_attempts(50);
        assert_eq!(gen.generate(&b, &g.waypoints(), &s).len(), 2);
    }

    #[test]
    fn test_partial_full_coverage_filter() {
        let (g, o, s) = setup(SignFilter::All);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let mode = ShuffleMode::Partial {
            fraction: 0.2,
            require_full_coverage: true,
        };
        let pool = VariantGenerator::new(mode, 3)
            .with_max_attempts(30)
            .generate(&b, &g.waypoints(), &s);
        for r in &pool {
            assert_eq!(r.len(), g.num_waypoints());
            assert_well_formed(r, &g);
        }
    }

    #[test]
    fn test_exhaustive_single_pass() {
        let (g, o, s) = setup(SignFilter::All);
        let b = RouteBuilder::new(o.distances(), 0, 7);
        let pool = VariantGenerator::new(ShuffleMode::Exhaustive, 99).generate(&b, &g.waypoints(), &s);
        assert_eq!(pool, b.build(&g.waypoints(), &s));
        let covered: usize = pool.iter().map(|r| r.len()).sum();
        assert_eq!(covered, g.num_waypoints());
    }

    #[test]
    fn test_unreachable_routes_dropped() {
        // Waypoint 2 is isolated.
        let g = Graph::new(4, vec![Edge::new(0, 1, 1.0), Edge::new(1, 3, 1.0)]).expect("valid");
        let o = DistanceOracle::build(&g);
        let b = RouteBuilder::new(o.distances(), 0, 3);
        let pool = VariantGenerator::new(ShuffleMode::Full, 3).generate(&b, &g.waypoints(), &[]);
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|r| r.waypoints() == [1]));
    }
}
