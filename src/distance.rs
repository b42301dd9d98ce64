//! Pairwise Euclidean distances over a measurement set.

use crate::points::PointSet;
use nalgebra::DMatrix;

/// Symmetric `n x n` distance matrix with a zero diagonal. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    dist: DMatrix<f64>,
}

impl DistanceMatrix {
    pub fn from_points(points: &PointSet) -> Self {
        let n = points.len();
        let mut dist = DMatrix::zeros(n, n);
        for a in 0..n {
            for b in (a + 1)..n {
                let d = (points[a] - points[b]).norm();
                dist[(a, b)] = d;
                dist[(b, a)] = d;
            }
        }
        Self { dist }
    }

    pub fn len(&self) -> usize {
        self.dist.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.nrows() == 0
    }

    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.dist[(a, b)]
    }

    /// Distances from point `a` to every point, in index order.
    pub fn row(&self, a: usize) -> Vec<f64> {
        self.dist.row(a).iter().copied().collect()
    }

    /// Sum of distances from each point to all others.
    pub fn row_sums(&self) -> Vec<f64> {
        self.dist.row_iter().map(|row| row.sum()).collect()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.dist
    }
}
