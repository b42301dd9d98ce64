//! Seed hypothesis and growth order.
//!
//! The origin candidate is the medoid of the measurements: the point with the
//! smallest summed distance to all others. Its nearest distinct neighbour
//! gives `v1`; `v2` is the perpendicular of `v1`, which keeps the seed basis
//! non-degenerate without needing a second independent observation.
//!
//! The same distances define the proximity order used by the growth loop.

use crate::distance::DistanceMatrix;
use crate::points::PointSet;
use crate::types::LatticeBasis;
use log::warn;
use nalgebra::Vector2;
use serde::Serialize;

/// Neighbours closer than this to the origin candidate are treated as duplicates.
const COINCIDENT_EPS: f64 = 1e-9;

/// Output of the seed stage.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSelection {
    /// Index of the origin candidate `g`.
    pub origin_index: usize,
    /// Index of the neighbour that defined `v1`, if one was distinct from `g`.
    pub neighbor_index: Option<usize>,
    pub basis: LatticeBasis,
    /// Point indices by ascending distance to `g` (stable, `order[0] == g`).
    pub order: Vec<usize>,
}

impl SeedSelection {
    pub fn from_distances(points: &PointSet, distances: &DistanceMatrix) -> Self {
        let origin_index = select_origin(distances);
        let order = proximity_order(distances, origin_index);
        let neighbor_index = order
            .iter()
            .copied()
            .find(|&idx| idx != origin_index && distances.get(origin_index, idx) > COINCIDENT_EPS);

        let origin = points[origin_index];
        let v1 = match neighbor_index {
            Some(idx) => points[idx] - origin,
            None => {
                warn!("seed: all points coincide with the origin candidate, using unit basis");
                Vector2::new(1.0, 0.0)
            }
        };

        Self {
            origin_index,
            neighbor_index,
            basis: LatticeBasis::new(origin, v1, perpendicular(&v1)),
            order,
        }
    }
}

/// Index minimising the summed distance to all other points (first on ties).
pub fn select_origin(distances: &DistanceMatrix) -> usize {
    let mut best = 0usize;
    let mut best_sum = f64::INFINITY;
    for (idx, sum) in distances.row_sums().into_iter().enumerate() {
        if sum < best_sum {
            best = idx;
            best_sum = sum;
        }
    }
    best
}

/// All indices sorted by ascending distance to `origin_index`; ties keep index order.
pub fn proximity_order(distances: &DistanceMatrix, origin_index: usize) -> Vec<usize> {
    let row = distances.row(origin_index);
    let mut order: Vec<usize> = (0..distances.len()).collect();
    order.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
    order
}

/// `(-v.y, v.x)`.
pub fn perpendicular(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}
