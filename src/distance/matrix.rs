//! Dense distance and predecessor matrices.

/// A dense n×n shortest-path distance matrix stored in row-major order.
///
/// Unreachable pairs hold `f64::INFINITY`.
///
/// # Examples
///
/// ```
/// use depot_routes::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(3);
/// assert_eq!(dm.get(0, 0), 0.0);
/// assert!(!dm.is_reachable(0, 2));
/// dm.set(0, 2, 4.5);
/// assert!(dm.is_reachable(0, 2));
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix with a zero diagonal and every other entry
    /// unreachable.
    pub fn new(size: usize) -> Self {
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { data, size }
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from `from` to `to`.
    ///
    /// Indices outside the matrix are unreachable.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        if from >= self.size || to >= self.size {
            return f64::INFINITY;
        }
        self.data[from * self.size + to]
    }

    /// Sets the distance from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Overwrites the whole row of `from`.
    ///
    /// # Panics
    ///
    /// Panics if `row.len()` differs from the matrix size.
    pub fn set_row(&mut self, from: usize, row: &[f64]) {
        let start = from * self.size;
        self.data[start..start + self.size].copy_from_slice(row);
    }

    /// Number of nodes in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if a finite path from `from` to `to` exists.
    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.get(from, to).is_finite()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    ///
    /// Two infinite entries compare equal.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                let (a, b) = (self.get(i, j), self.get(j, i));
                if a.is_infinite() && b.is_infinite() {
                    continue;
                }
                if (a - b).abs() > tol || a.is_infinite() != b.is_infinite() {
                    return false;
                }
            }
        }
        true
    }
}

/// Predecessor table: `get(source, node)` is the node preceding `node` on
/// the shortest path from `source`, or `None` for the source itself and
/// for unreachable nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentMatrix {
    data: Vec<Option<usize>>,
    size: usize,
}

impl ParentMatrix {
    /// Creates a table with no predecessors recorded.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![None; size * size],
            size,
        }
    }

    /// Predecessor of `node` on the shortest path from `source`; `None`
    /// for indices outside the table.
    pub fn get(&self, source: usize, node: usize) -> Option<usize> {
        if source >= self.size || node >= self.size {
            return None;
        }
        self.data[source * self.size + node]
    }

    /// Records the predecessor of `node` for `source`.
    pub fn set(&mut self, source: usize, node: usize, parent: Option<usize>) {
        self.data[source * self.size + node] = parent;
    }

    /// Overwrites the whole row of `source`.
    pub fn set_row(&mut self, source: usize, row: &[Option<usize>]) {
        let start = source * self.size;
        self.data[start..start + self.size].copy_from_slice(row);
    }

    /// Number of nodes in this table.
    pub fn size(&self) -> usize {
        self.size
    }
}
