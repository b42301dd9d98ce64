use crate::points::PointSet;
use nalgebra::{Matrix2, Vector2};
use serde::{Deserialize, Serialize};

/// Integer lattice coordinate `(i, j)` of one measurement.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LatticeCoord {
    pub i: i32,
    pub j: i32,
}

impl LatticeCoord {
    pub const ZERO: Self = Self { i: 0, j: 0 };

    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    pub fn offset(self, di: i32, dj: i32) -> Self {
        Self {
            i: self.i.saturating_add(di),
            j: self.j.saturating_add(dj),
        }
    }

    /// `max(|i|, |j|)`.
    pub fn chebyshev_norm(self) -> u32 {
        self.i.unsigned_abs().max(self.j.unsigned_abs())
    }
}

impl From<(i32, i32)> for LatticeCoord {
    fn from((i, j): (i32, i32)) -> Self {
        Self { i, j }
    }
}

/// Geometric lattice hypothesis: an origin plus the two generating vectors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeBasis {
    pub origin: Vector2<f64>,
    pub v1: Vector2<f64>,
    pub v2: Vector2<f64>,
}

impl LatticeBasis {
    /// Number of free scalars packed by [`LatticeBasis::to_params`].
    pub const PARAM_COUNT: usize = 6;

    pub fn new(origin: Vector2<f64>, v1: Vector2<f64>, v2: Vector2<f64>) -> Self {
        Self { origin, v1, v2 }
    }

    /// Column matrix `[v1 v2]`.
    pub fn matrix(&self) -> Matrix2<f64> {
        Matrix2::from_columns(&[self.v1, self.v2])
    }

    /// Lattice point `origin + i·v1 + j·v2`.
    pub fn reconstruct(&self, coord: LatticeCoord) -> Vector2<f64> {
        self.origin + self.v1 * f64::from(coord.i) + self.v2 * f64::from(coord.j)
    }

    /// Signed area spanned by the basis (`v1 × v2`).
    pub fn cross(&self) -> f64 {
        self.v1.x * self.v2.y - self.v1.y * self.v2.x
    }

    /// `|sin|` of the angle between the basis vectors; 0 for zero-length vectors.
    pub fn basis_sine(&self) -> f64 {
        let n1 = self.v1.norm();
        let n2 = self.v2.norm();
        if !(n1 > 0.0 && n2 > 0.0) {
            return 0.0;
        }
        (self.cross() / (n1 * n2)).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.to_params().iter().all(|v| v.is_finite())
    }

    /// True when integer coordinates can no longer be recovered reliably.
    pub fn is_degenerate(&self, min_sine: f64) -> bool {
        !self.is_finite() || self.basis_sine() < min_sine
    }

    /// Packs the hypothesis as `[ox, oy, v1x, v1y, v2x, v2y]`.
    pub fn to_params(&self) -> [f64; 6] {
        [
            self.origin.x,
            self.origin.y,
            self.v1.x,
            self.v1.y,
            self.v2.x,
            self.v2.y,
        ]
    }

    pub fn from_params(p: &[f64; 6]) -> Self {
        Self {
            origin: Vector2::new(p[0], p[1]),
            v1: Vector2::new(p[2], p[3]),
            v2: Vector2::new(p[4], p[5]),
        }
    }
}

/// Final estimate returned by the denoiser.
///
/// `coords[k]` belongs to input point `k`; the ordering of the caller's point
/// set is preserved.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatticeFit {
    pub coords: Vec<LatticeCoord>,
    pub basis: LatticeBasis,
    /// Sum of squared reconstruction errors reported by the last refinement.
    pub total_sq_err: f64,
}

impl LatticeFit {
    pub fn origin(&self) -> Vector2<f64> {
        self.basis.origin
    }

    pub fn v1(&self) -> Vector2<f64> {
        self.basis.v1
    }

    pub fn v2(&self) -> Vector2<f64> {
        self.basis.v2
    }

    /// Ideal lattice position of every measurement.
    pub fn reconstructed(&self) -> Vec<Vector2<f64>> {
        self.coords
            .iter()
            .map(|&c| self.basis.reconstruct(c))
            .collect()
    }

    /// Euclidean distance between each measurement and its reconstruction.
    ///
    /// `points` must be the set the fit was computed from.
    pub fn residuals(&self, points: &PointSet) -> Vec<f64> {
        debug_assert_eq!(
            points.len(),
            self.coords.len(),
            "point set does not match the fitted coordinates"
        );
        points
            .iter()
            .zip(&self.coords)
            .map(|(p, &c)| (self.basis.reconstruct(c) - p).norm())
            .collect()
    }

    /// Mean over points of the squared reconstruction distance.
    pub fn mean_squared_error(&self, points: &PointSet) -> f64 {
        let residuals = self.residuals(points);
        if residuals.is_empty() {
            return 0.0;
        }
        residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64
    }

    /// Extent of the assigned coordinates as `(imin, imax, jmin, jmax)`.
    pub fn coordinate_range(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.coords.first()?;
        let init = (first.i, first.i, first.j, first.j);
        Some(self.coords.iter().fold(init, |(imin, imax, jmin, jmax), c| {
            (imin.min(c.i), imax.max(c.i), jmin.min(c.j), jmax.max(c.j))
        }))
    }
}
