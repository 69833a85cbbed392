//! The savings-based route solver.

use tracing::{info, warn};

use super::{SelectionMode, Solver, SolverConfig};
use crate::constructive::{RouteBuilder, VariantGenerator};
use crate::distance::DistanceOracle;
use crate::error::RoutingError;
use crate::expansion::RouteExpander;
use crate::models::{Graph, PlannedRoute, Solution};
use crate::savings::SavingsComputer;
use crate::selection::{top_routes, Acceptance, DiversitySelector, SelectedRoute};

/// Builds start-to-end routes with the separate-depot savings heuristic.
///
/// Pipeline: all-pairs shortest paths, savings list, randomized variants,
/// selection, and expansion of every selected route into graph edges.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph};
/// use depot_routes::solver::{SavingsSolver, Solver};
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 2.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 2.0),
///     Edge::new(0, 2, 5.0),
///     Edge::new(1, 3, 5.0),
/// ]).unwrap();
///
/// let solution = SavingsSolver::default().solve(&graph, 1).unwrap();
/// assert_eq!(solution.edge_paths(), vec![vec![(0, 1), (1, 2), (2, 3)]]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SavingsSolver {
    config: SolverConfig,
}

impl SavingsSolver {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Solver for SavingsSolver {
    fn name(&self) -> &str {
        "clarke-wright-savings"
    }

    fn solve(&self, graph: &Graph, n_of_roads: usize) -> Result<Solution, RoutingError> {
        self.config.validate()?;

        let num_nodes = graph.num_nodes();
        if num_nodes < 3 {
            warn!(nodes = num_nodes, "at least 3 nodes are required");
            return Ok(Solution::empty());
        }

        let start = graph.start_depot();
        let end = graph.end_depot();
        let customers = graph.waypoints();
        info!(
            start_depot = start,
            end_depot = end,
            waypoints = customers.len(),
            "solving with savings heuristic"
        );

        let oracle = DistanceOracle::build(graph);
        let savings = SavingsComputer::new(self.config.formula, self.config.effective_sign_filter())
            .compute(graph, oracle.distances())?;

        let builder = RouteBuilder::new(oracle.distances(), start, end);
        let mut generator =
            VariantGenerator::new(self.config.shuffle, self.config.variants_for(customers.len()))
                .with_seed(self.config.seed);
        if let Some(attempts) = self.config.max_attempts {
            generator = generator.with_max_attempts(attempts);
        }
        let pool = generator.generate(&builder, &customers, &savings);
        if pool.is_empty() {
            warn!("no feasible route found");
            return Ok(Solution::empty());
        }

        let selected: Vec<SelectedRoute> = match &self.config.selection {
            SelectionMode::Ranked => top_routes(&pool, n_of_roads)
                .into_iter()
                .map(|route| SelectedRoute {
                    route,
                    acceptance: Acceptance::Ranked,
                })
                .collect(),
            SelectionMode::Diverse(diversity) => {
                DiversitySelector::new(graph, &oracle, diversity.clone())
                    .with_formula(self.config.formula)
                    .select(&pool, n_of_roads)
            }
        };

        let expander = RouteExpander::new(&oracle, start, end);
        let mut solution = Solution::empty();
        for (rank, SelectedRoute { route, acceptance }) in selected.into_iter().enumerate() {
            info!(
                rank = rank + 1,
                waypoints = ?route.waypoints(),
                distance = route.total_distance(),
                ?acceptance,
                "selected route"
            );
            let expansion = expander.expand(&route);
            solution.add_route(PlannedRoute {
                route,
                expansion,
                acceptance,
            });
        }
        Ok(solution)
    }
}

/// Solves with the default configuration and returns one `(node, node)`
/// edge sequence per route, best first.
pub fn solve_clarke_savings(
    graph: &Graph,
    n_of_roads: usize,
) -> Result<Vec<Vec<(usize, usize)>>, RoutingError> {
    Ok(SavingsSolver::default().solve(graph, n_of_roads)?.edge_paths())
}
