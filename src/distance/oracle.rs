//! All-pairs shortest paths with on-demand path reconstruction.
//!
//! # Algorithm
//!
//! Dijkstra's algorithm is run once from every node. Edge costs are
//! validated non-negative by [`Graph::new`], so a binary heap keyed on
//! tentative distance is exact.
//!
//! # Complexity
//!
//! O(V · (V + E) log V) time and O(V²) memory.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use super::{DistanceMatrix, ParentMatrix};
use crate::models::Graph;

/// Heap entry ordered so that the smallest distance pops first.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    distance: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Single-source Dijkstra over `graph`.
///
/// Returns the distance row (infinite where unreachable) and the
/// predecessor row (`None` for the source and unreachable nodes).
pub fn dijkstra(graph: &Graph, source: usize) -> (Vec<f64>, Vec<Option<usize>>) {
    let n = graph.num_nodes();
    let mut dist = vec![f64::INFINITY; n];
    let mut parent = vec![None; n];
    dist[source] = 0.0;

    let mut heap = BinaryHeap::new();
    heap.push(Frontier {
        distance: 0.0,
        node: source,
    });

    while let Some(Frontier { distance, node }) = heap.pop() {
        if distance > dist[node] {
            continue;
        }
        for &(next, cost) in graph.neighbors(node) {
            let candidate = distance + cost;
            if candidate < dist[next] {
                dist[next] = candidate;
                parent[next] = Some(node);
                heap.push(Frontier {
                    distance: candidate,
                    node: next,
                });
            }
        }
    }

    (dist, parent)
}

/// Shortest-path distances and predecessors for every node pair.
///
/// Built once per graph and read-only afterwards.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph};
/// use depot_routes::distance::DistanceOracle;
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 2.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 2.0),
///     Edge::new(0, 2, 5.0),
/// ]).unwrap();
/// let oracle = DistanceOracle::build(&graph);
/// assert_eq!(oracle.distance(0, 2), 3.0);
/// assert_eq!(oracle.path(0, 3), Some(vec![0, 1, 2, 3]));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceOracle {
    distances: DistanceMatrix,
    parents: ParentMatrix,
}

impl DistanceOracle {
    /// Runs Dijkstra from every node of `graph`.
    pub fn build(graph: &Graph) -> Self {
        let n = graph.num_nodes();
        let mut distances = DistanceMatrix::new(n);
        let mut parents = ParentMatrix::new(n);
        for source in 0..n {
            let (dist, parent) = dijkstra(graph, source);
            distances.set_row(source, &dist);
            parents.set_row(source, &parent);
        }
        debug!(nodes = n, edges = graph.edges().len(), "built all-pairs distance oracle");
        Self { distances, parents }
    }

    /// Shortest-path distance, `f64::INFINITY` if unreachable.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// The full distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// The full predecessor table.
    pub fn parents(&self) -> &ParentMatrix {
        &self.parents
    }

    /// Number of nodes covered.
    pub fn size(&self) -> usize {
        self.distances.size()
    }

    /// Node sequence of the shortest path `from → to`, both ends included.
    ///
    /// Returns `None` if either node is outside the graph, `to` is
    /// unreachable from `from`, or the predecessor chain is broken. A path from a node to itself is the
    /// single node.
    pub fn path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        if from >= self.size() || to >= self.size() {
            return None;
        }
        if from == to {
            return Some(vec![from]);
        }
        let mut path = vec![to];
        let mut current = to;
        // A valid chain never exceeds the node count.
        for _ in 0..self.size() {
            current = self.parents.get(from, current)?;
            path.push(current);
            if current == from {
                path.reverse();
                return Some(path);
            }
        }
        None
    }

    /// Edges of the shortest path `from → to` as consecutive node pairs.
    ///
    /// `Some(vec![])` when `from == to`.
    pub fn path_edges(&self, from: usize, to: usize) -> Option<Vec<(usize, usize)>> {
        let nodes = self.path(from, to)?;
        Some(nodes.windows(2).map(|w| (w[0], w[1])).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Edge;
    use proptest::prelude::*;

    fn sample() -> Graph {
        Graph::new(
            4,
            vec![
                Edge::new(0, 1, 2.0),
                Edge::new(1, 2, 1.0),
                Edge::new(2, 3, 2.0),
                Edge::new(0, 2, 5.0),
                Edge::new(1, 3, 5.0),
            ],
        )
        .expect("valid graph")
    }

    #[test]
    fn test_distances_sample() {
        let o = DistanceOracle::build(&sample());
        assert_eq!(o.distance(0, 1), 2.0);
        assert_eq!(o.distance(0, 2), 3.0);
        assert_eq!(o.distance(0, 3), 5.0);
        assert_eq!(o.distance(1, 3), 3.0);
        assert!(o.distances().is_symmetric(1e-10));
    }

    #[test]
    fn test_path_reconstruction() {
        let o = DistanceOracle::build(&sample());
        assert_eq!(o.path(0, 3), Some(vec![0, 1, 2, 3]));
        assert_eq!(o.path(3, 0), Some(vec![3, 2, 1, 0]));
        assert_eq!(o.path(2, 2), Some(vec![2]));
        assert_eq!(o.path_edges(0, 2), Some(vec![(0, 1), (1, 2)]));
        assert_eq!(o.path_edges(1, 1), Some(vec![]));
    }

    #[test]
    fn test_unreachable() {
        let g = Graph::new(4, vec![Edge::new(0, 1, 1.0), Edge::new(2, 3, 1.0)]).expect("valid");
        let o = DistanceOracle::build(&g);
        assert_eq!(o.distance(0, 3), f64::INFINITY);
        assert_eq!(o.path(0, 3), None);
        assert_eq!(o.path_edges(1, 2), None);
        assert_eq!(o.distance(2, 3), 1.0);
    }

    #[test]
    fn test_unknown_nodes_have_no_path() {
        let o = DistanceOracle::build(&sample());
        assert_eq!(o.distance(0, 5), f64::INFINITY);
        assert_eq!(o.path(0, 5), None);
        assert_eq!(o.path(5, 5), None);
        assert_eq!(o.path_edges(9, 1), None);
    }

    #[test]
    fn test_zero_cost_edges() {
        let g = Graph::new(3, vec![Edge::new(0, 1, 0.0), Edge::new(1, 2, 0.0)]).expect("valid");
        let o = DistanceOracle::build(&g);
        assert_eq!(o.distance(0, 2), 0.0);
        assert_eq!(o.path(0, 2), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_broken_chain_is_none() {
        let g = Graph::new(3, vec![Edge::new(0, 1, 1.0)]).expect("valid");
        let mut o = DistanceOracle::build(&g);
        // Corrupt the chain into a cycle that never reaches the source.
        o.parents.set(0, 1, Some(2));
        o.parents.set(0, 2, Some(1));
        assert_eq!(o.path(0, 1), None);
    }

    /// Floyd-Warshall reference.
    fn brute_force(n: usize, edges: &[Edge]) -> Vec<Vec<f64>> {
        let mut d = vec![vec![f64::INFINITY; n]; n];
        for (i, row) in d.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        for e in edges {
            if e.cost < d[e.u][e.v] {
                d[e.u][e.v] = e.cost;
                d[e.v][e.u] = e.cost;
            }
        }
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    let via = d[i][k] + d[k][j];
                    if via < d[i][j] {
                        d[i][j] = via;
                    }
                }
            }
        }
        d
    }

    fn arb_graph() -> impl Strategy<Value = (usize, Vec<Edge>)> {
        (2usize..9).prop_flat_map(|n| {
            let edge = (0..n, 0..n, 0u32..20).prop_map(|(u, v, c)| Edge::new(u, v, c as f64));
            (Just(n), prop::collection::vec(edge, 0..(n * 3)))
        })
    }

    proptest! {
        #[test]
        fn prop_matches_floyd_warshall((n, edges) in arb_graph()) {
            let g = Graph::new(n, edges.clone()).expect("generated edges are valid");
            let o = DistanceOracle::build(&g);
            let reference = brute_force(n, &edges);
            for i in 0..n {
                prop_assert_eq!(o.distance(i, i), 0.0);
                for j in 0..n {
                    let (a, b) = (o.distance(i, j), reference[i][j]);
                    prop_assert!(a == b || (a - b).abs() < 1e-9, "d({},{}) = {} vs {}", i, j, a, b);
                }
            }
        }

        #[test]
        fn prop_triangle_inequality((n, edges) in arb_graph()) {
            let g = Graph::new(n, edges).expect("generated edges are valid");
            let o = DistanceOracle::build(&g);
            for i in 0..n {
                for j in 0..n {
                    for k in 0..n {
                        prop_assert!(o.distance(i, k) <= o.distance(i, j) + o.distance(j, k) + 1e-9);
                    }
                }
            }
        }

        #[test]
        fn prop_path_cost_equals_distance((n, edges) in arb_graph()) {
            let g = Graph::new(n, edges).expect("generated edges are valid");
            let o = DistanceOracle::build(&g);
            for i in 0..n {
                for j in 0..n {
                    match o.path_edges(i, j) {
                        Some(hops) => {
                            let cost: f64 = hops
                                .iter()
                                .map(|&(a, b)| g.edge_cost(a, b).expect("hop is an edge"))
                                .sum();
                            prop_assert!((cost - o.distance(i, j)).abs() < 1e-9);
                        }
                        None => prop_assert!(o.distance(i, j).is_infinite()),
                    }
                }
            }
        }
    }
}
