//! Reconstruction cost shared by the refiner and the diagnostics.

use crate::points::PointSet;
use crate::types::{LatticeBasis, LatticeCoord};
use nalgebra::Vector2;

/// One active measurement paired with its (fixed) integer coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub point: Vector2<f64>,
    pub coord: LatticeCoord,
}

/// Collects `(points[idx], coords[idx])` for every index in `active`.
pub fn gather_samples(points: &PointSet, active: &[usize], coords: &[LatticeCoord]) -> Vec<Sample> {
    active
        .iter()
        .map(|&idx| Sample {
            point: points[idx],
            coord: coords[idx],
        })
        .collect()
}

/// Sum of squared distances between each sample and its lattice reconstruction.
pub fn reconstruction_cost(basis: &LatticeBasis, samples: &[Sample]) -> f64 {
    samples
        .iter()
        .map(|s| (basis.reconstruct(s.coord) - s.point).norm_squared())
        .sum()
}

/// [`reconstruction_cost`] over packed `[ox, oy, v1x, v1y, v2x, v2y]` parameters.
pub fn packed_cost(params: &[f64; LatticeBasis::PARAM_COUNT], samples: &[Sample]) -> f64 {
    reconstruction_cost(&LatticeBasis::from_params(params), samples)
}
