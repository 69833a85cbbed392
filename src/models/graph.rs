//! Weighted undirected graph with fixed start and end depots.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// A planar coordinate attached to a node.
///
/// Coordinates are optional; only the coordinate-based savings formula
/// reads them.
///
/// # Examples
///
/// ```
/// use depot_routes::models::Point;
///
/// let a = Point::new(0.0, 0.0);
/// let b = Point::new(3.0, 4.0);
/// assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate.
    pub x: f64,
    /// Y-coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An undirected edge between nodes `u` and `v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// One endpoint.
    pub u: usize,
    /// The other endpoint.
    pub v: usize,
    /// Traversal cost, non-negative.
    pub cost: f64,
}

impl Edge {
    /// Creates an edge.
    pub fn new(u: usize, v: usize, cost: f64) -> Self {
        Self { u, v, cost }
    }

    /// Returns `true` if this edge connects `a` and `b` in either direction.
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.u == a && self.v == b) || (self.u == b && self.v == a)
    }
}

/// A validated graph of `num_nodes` nodes and undirected weighted edges.
///
/// Node `0` is the start depot and node `num_nodes - 1` the end depot;
/// every other node is a waypoint.
///
/// # Examples
///
/// ```
/// use depot_routes::models::{Edge, Graph};
///
/// let graph = Graph::new(4, vec![
///     Edge::new(0, 1, 2.0),
///     Edge::new(1, 2, 1.0),
///     Edge::new(2, 3, 2.0),
/// ]).unwrap();
/// assert_eq!(graph.start_depot(), 0);
/// assert_eq!(graph.end_depot(), 3);
/// assert_eq!(graph.waypoints(), vec![1, 2]);
/// assert_eq!(graph.edge_cost(2, 1), Some(1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    num_nodes: usize,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, f64)>>,
    points: Option<Vec<Point>>,
}

impl Graph {
    /// Validates the edge list and builds adjacency lists.
    ///
    /// Rejects edges with out-of-range endpoints, negative costs, or
    /// non-finite costs.
    pub fn new(num_nodes: usize, edges: Vec<Edge>) -> Result<Self, RoutingError> {
        let mut adjacency = vec![Vec::new(); num_nodes];
        for (edge_index, edge) in edges.iter().enumerate() {
            for node in [edge.u, edge.v] {
                if node >= num_nodes {
                    return Err(RoutingError::NodeOutOfRange {
                        edge_index,
                        node,
                        num_nodes,
                    });
                }
            }
            if !edge.cost.is_finite() {
                return Err(RoutingError::NonFiniteCost { edge_index });
            }
            if edge.cost < 0.0 {
                return Err(RoutingError::NegativeCost {
                    edge_index,
                    cost: edge.cost,
                });
            }
            adjacency[edge.u].push((edge.v, edge.cost));
            if edge.u != edge.v {
                adjacency[edge.v].push((edge.u, edge.cost));
            }
        }
        Ok(Self {
            num_nodes,
            edges,
            adjacency,
            points: None,
        })
    }

    /// Builds a graph whose edge costs are the Euclidean lengths between
    /// the given points. Coordinates stay attached to the graph.
    pub fn from_points(points: Vec<Point>, pairs: &[(usize, usize)]) -> Result<Self, RoutingError> {
        let n = points.len();
        let mut edges = Vec::with_capacity(pairs.len());
        for (edge_index, &(u, v)) in pairs.iter().enumerate() {
            let node = if u >= n { u } else { v };
            if u >= n || v >= n {
                return Err(RoutingError::NodeOutOfRange {
                    edge_index,
                    node,
                    num_nodes: n,
                });
            }
            edges.push(Edge::new(u, v, points[u].distance_to(&points[v])));
        }
        Self::new(n, edges)?.with_points(points)
    }

    /// Attaches node coordinates. The count must match the node count.
    pub fn with_points(mut self, points: Vec<Point>) -> Result<Self, RoutingError> {
        if points.len() != self.num_nodes {
            return Err(RoutingError::PointCountMismatch {
                expected: self.num_nodes,
                found: points.len(),
            });
        }
        self.points = Some(points);
        Ok(self)
    }

    /// Number of nodes, depots included.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// The validated edge list, in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Neighbors of `node` with the cost of the connecting edge.
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adjacency[node]
    }

    /// Node coordinates, if attached.
    pub fn points(&self) -> Option<&[Point]> {
        self.points.as_deref()
    }

    /// Cost of the cheapest direct edge between `u` and `v`.
    pub fn edge_cost(&self, u: usize, v: usize) -> Option<f64> {
        self.adjacency
            .get(u)?
            .iter()
            .filter(|&&(to, _)| to == v)
            .map(|&(_, cost)| cost)
            .min_by(f64::total_cmp)
    }

    /// Index of the start depot.
    pub fn start_depot(&self) -> usize {
        0
    }

    /// Index of the end depot.
    pub fn end_depot(&self) -> usize {
        self.num_nodes.saturating_sub(1)
    }

    /// Number of waypoints (nodes strictly between the depots).
    pub fn num_waypoints(&self) -> usize {
        self.num_nodes.saturating_sub(2)
    }

    /// Waypoint indices in ascending order.
    pub fn waypoints(&self) -> Vec<usize> {
        (1..=self.num_waypoints()).collect()
    }

    /// Returns a copy where every edge touching a node flagged in `used`
    /// costs `1 + penalty` times more per flagged endpoint.
    ///
    /// Coordinates are carried over unchanged.
    pub fn with_node_penalty(&self, used: &[bool], penalty: f64) -> Self {
        let flagged = |node: usize| used.get(node).copied().unwrap_or(false);
        let edges: Vec<Edge> = self
            .edges
            .iter()
            .map(|e| {
                let hits = flagged(e.u) as i32 + flagged(e.v) as i32;
                Edge::new(e.u, e.v, e.cost * (1.0 + penalty).powi(hits))
            })
            .collect();
        let mut adjacency = vec![Vec::new(); self.num_nodes];
        for e in &edges {
            adjacency[e.u].push((e.v, e.cost));
            if e.u != e.v {
                adjacency[e.v].push((e.u, e.cost));
            }
        }
        Self {
            num_nodes: self.num_nodes,
            edges,
            adjacency,
            points: self.points.clone(),
        }
    }
}
