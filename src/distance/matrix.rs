//! Dense distance matrix.

/// A dense n×n travel distance matrix stored in row-major order.
///
/// Site indices are assigned once when the model is loaded; every lookup
/// after that is a bound-checked array access, never a hash lookup.
///
/// # Examples
///
/// ```
/// use warehouse_siting::distance::DistanceMatrix;
///
/// let mut dm = DistanceMatrix::new(3);
/// dm.set_symmetric(0, 1, 5.0);
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert_eq!(dm.get(1, 0), 5.0);
/// assert_eq!(dm.get(2, 2), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Creates a distance matrix from an explicit n×n grid in row-major order.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance between sites `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance in one direction only.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Sets the distance in both directions.
    pub fn set_symmetric(&mut self, a: usize, b: usize, distance: f64) {
        self.set(a, b, distance);
        self.set(b, a, distance);
    }

    /// Number of sites in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns `true` if every entry is finite and nonnegative and the
    /// diagonal is zero.
    pub fn is_valid(&self) -> bool {
        for i in 0..self.size {
            if self.get(i, i) != 0.0 {
                return false;
            }
            for j in 0..self.size {
                let d = self.get(i, j);
                if !d.is_finite() || d < 0.0 {
                    return false;
                }
            }
        }
        true
    }

    /// Largest entry in the matrix (zero for an empty matrix).
    pub fn max_distance(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Returns the candidate nearest to `from`, breaking distance ties
    /// toward the earliest candidate in the slice.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &c in candidates {
            let d = self.get(from, c);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((c, d)),
            }
        }
        best.map(|(c, _)| c)
    }
}
