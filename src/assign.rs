//! Integer coordinate assignment under a fixed lattice hypothesis.
//!
//! For one measurement `p` the assigner
//! 1. solves `[v1 v2]·λ = p − origin` for the real lattice coordinate
//!    (`λ = 0` when `p` sits on the origin or the system is singular),
//! 2. rounds `λ` and clamps both components to `[-bound, bound]`,
//! 3. scans the 3x3 integer neighbourhood of the rounded value and keeps the
//!    candidate whose reconstruction is closest to `p`.
//!
//! Candidates outside `[-bound, bound]` are never returned, so every
//! assignment made at growth iteration `it` satisfies `max(|i|, |j|) <= it`.

use crate::points::PointSet;
use crate::types::{LatticeBasis, LatticeCoord};
use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Distance below which a point is considered to coincide with the origin.
pub const ORIGIN_EPS: f64 = 1e-3;

const DEFAULT_MIN_POINTS_FOR_PARALLEL: usize = 64;

/// Controls whether per-point assignment runs sequentially or with Rayon.
///
/// Has no effect unless the crate is built with the `parallel` feature.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelAssignOptions {
    pub enabled: bool,
    pub min_points_for_parallel: usize,
}

impl ParallelAssignOptions {
    pub fn new(enabled: bool, min_points_for_parallel: usize) -> Self {
        Self {
            enabled,
            min_points_for_parallel: min_points_for_parallel.max(1),
        }
    }

    /// Disable parallel assignment regardless of point count.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            min_points_for_parallel: usize::MAX,
        }
    }

    /// Returns true when parallel assignment should be used for `point_count`.
    pub fn should_parallelize(&self, point_count: usize) -> bool {
        self.enabled && point_count >= self.min_points_for_parallel
    }
}

impl Default for ParallelAssignOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            min_points_for_parallel: DEFAULT_MIN_POINTS_FOR_PARALLEL,
        }
    }
}

/// Assigns integer coordinates for one growth iteration.
#[derive(Clone, Copy, Debug)]
pub struct CoordinateAssigner {
    bound: i32,
    origin_eps: f64,
}

impl CoordinateAssigner {
    pub fn new(bound: i32) -> Self {
        Self {
            bound: bound.max(0),
            origin_eps: ORIGIN_EPS,
        }
    }

    pub fn with_origin_eps(mut self, origin_eps: f64) -> Self {
        self.origin_eps = origin_eps;
        self
    }

    pub fn bound(&self) -> i32 {
        self.bound
    }

    /// Real-valued lattice coordinate of `p` under `basis`.
    pub fn lambda(&self, p: &Vector2<f64>, basis: &LatticeBasis) -> Vector2<f64> {
        let delta = p - basis.origin;
        if delta.norm() < self.origin_eps {
            return Vector2::zeros();
        }
        match basis
            .matrix()
            .try_inverse()
            .map(|inv| inv * delta)
            .filter(|l| l.x.is_finite() && l.y.is_finite())
        {
            Some(lambda) => lambda,
            None => {
                debug!(
                    "assign: singular basis (sine={:.3e}), using lambda=0",
                    basis.basis_sine()
                );
                Vector2::zeros()
            }
        }
    }

    /// Best integer coordinate for `p` within the 3x3 neighbourhood of the
    /// rounded, clamped `λ`.
    pub fn assign(&self, p: &Vector2<f64>, basis: &LatticeBasis) -> LatticeCoord {
        let lambda = self.lambda(p, basis);
        let bound = f64::from(self.bound);
        let rounded = LatticeCoord::new(
            lambda.x.round().clamp(-bound, bound) as i32,
            lambda.y.round().clamp(-bound, bound) as i32,
        );

        let mut best = rounded;
        let mut best_dist = (basis.reconstruct(rounded) - p).norm();
        for di in -1..=1 {
            for dj in -1..=1 {
                let candidate = rounded.offset(di, dj);
                if candidate.chebyshev_norm() > self.bound.unsigned_abs() {
                    continue;
                }
                let dist = (basis.reconstruct(candidate) - p).norm();
                if dist < best_dist {
                    best_dist = dist;
                    best = candidate;
                }
            }
        }
        best
    }

    /// Re-assigns every index in `active`, overwriting `coords` in place.
    ///
    /// Returns how many assignments changed. The parallel path yields the
    /// same coordinates as the sequential one.
    pub fn assign_active(
        &self,
        points: &PointSet,
        active: &[usize],
        basis: &LatticeBasis,
        coords: &mut [LatticeCoord],
        parallel: ParallelAssignOptions,
    ) -> usize {
        if active.is_empty() {
            return 0;
        }

        if parallel.should_parallelize(active.len()) {
            #[cfg(feature = "parallel")]
            {
                return self.assign_active_parallel(points, active, basis, coords);
            }
        }

        self.assign_active_sequential(points, active, basis, coords)
    }

    fn assign_active_sequential(
        &self,
        points: &PointSet,
        active: &[usize],
        basis: &LatticeBasis,
        coords: &mut [LatticeCoord],
    ) -> usize {
        let mut changed = 0usize;
        for &idx in active {
            let coord = self.assign(&points[idx], basis);
            if coords[idx] != coord {
                changed += 1;
            }
            coords[idx] = coord;
        }
        changed
    }

    #[cfg(feature = "parallel")]
    fn assign_active_parallel(
        &self,
        points: &PointSet,
        active: &[usize],
        basis: &LatticeBasis,
        coords: &mut [LatticeCoord],
    ) -> usize {
        use rayon::prelude::*;

        let updates: Vec<(usize, LatticeCoord)> = active
            .par_iter()
            .map(|&idx| (idx, self.assign(&points[idx], basis)))
            .collect();

        let mut changed = 0usize;
        for (idx, coord) in updates {
            if coords[idx] != coord {
                changed += 1;
            }
            coords[idx] = coord;
        }
        changed
    }
}

/// Convenience wrapper around [`CoordinateAssigner::assign`] with the default
/// origin tolerance.
pub fn assign_coordinate(p: &Vector2<f64>, basis: &LatticeBasis, bound: i32) -> LatticeCoord {
    CoordinateAssigner::new(bound).assign(p, basis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed() -> LatticeBasis {
        LatticeBasis::new(
            Vector2::new(0.5, -0.5),
            Vector2::new(1.0, 0.2),
            Vector2::new(-0.2, 1.0),
        )
    }

    #[test]
    fn exact_lattice_points_map_to_their_coordinates() {
        let basis = skewed();
        for &(i, j) in &[(0, 0), (2, -1), (-3, 3), (1, 4)] {
            let coord = LatticeCoord::new(i, j);
            let p = basis.reconstruct(coord);
            assert_eq!(assign_coordinate(&p, &basis, 10), coord);
        }
    }

    #[test]
    fn noisy_point_snaps_to_nearest_lattice_site() {
        let basis = skewed();
        let p = basis.reconstruct(LatticeCoord::new(2, 1)) + Vector2::new(0.31, -0.27);
        assert_eq!(assign_coordinate(&p, &basis, 10), LatticeCoord::new(2, 1));
    }

    #[test]
    fn point_on_origin_gets_zero() {
        let basis = skewed();
        let p = basis.origin + Vector2::new(1e-4, -1e-4);
        let assigner = CoordinateAssigner::new(4);
        assert_eq!(assigner.lambda(&p, &basis), Vector2::zeros());
        assert_eq!(assigner.assign(&p, &basis), LatticeCoord::ZERO);
    }

    #[test]
    fn far_points_are_clamped_to_the_bound() {
        let basis = skewed();
        let p = basis.reconstruct(LatticeCoord::new(9, -7));
        let coord = assign_coordinate(&p, &basis, 4);
        assert_eq!(coord, LatticeCoord::new(4, -4));
        assert!(coord.chebyshev_norm() <= 4);
    }

    #[test]
    fn search_never_steps_past_the_bound() {
        let basis = LatticeBasis::new(
            Vector2::zeros(),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        );
        // (5, 0) is closer but lies outside the bound.
        let p = Vector2::new(4.9, 0.0);
        assert_eq!(assign_coordinate(&p, &basis, 4), LatticeCoord::new(4, 0));
    }

    #[test]
    fn singular_basis_falls_back_to_origin_neighbourhood() {
        let basis = LatticeBasis::new(
            Vector2::zeros(),
            Vector2::new(1.0, 0.0),
            Vector2::new(2.0, 0.0),
        );
        let p = Vector2::new(0.9, 0.0);
        let assigner = CoordinateAssigner::new(4);
        assert_eq!(assigner.lambda(&p, &basis), Vector2::zeros());
        let coord = assigner.assign(&p, &basis);
        assert!(coord.chebyshev_norm() <= 1);
        assert!((basis.reconstruct(coord) - p).norm() < 0.2);
    }

    #[test]
    fn non_finite_basis_yields_zero_lambda() {
        let _ = env_logger::builder().is_test(true).try_init();
        let basis = LatticeBasis::new(
            Vector2::zeros(),
            Vector2::new(f64::INFINITY, 0.0),
            Vector2::new(0.0, 1.0),
        );
        let assigner = CoordinateAssigner::new(4);
        assert_eq!(assigner.lambda(&Vector2::new(0.5, 2.0), &basis), Vector2::zeros());
    }

    #[test]
    fn assign_active_only_touches_active_indices() {
        let basis = skewed();
        let truth = [
            LatticeCoord::new(0, 0),
            LatticeCoord::new(1, 0),
            LatticeCoord::new(0, 1),
            LatticeCoord::new(1, 1),
            LatticeCoord::new(-1, 2),
        ];
        let pts: Vec<[f64; 2]> = truth
            .iter()
            .map(|&c| {
                let p = basis.reconstruct(c);
                [p.x, p.y]
            })
            .collect();
        let points = PointSet::from_points(&pts).unwrap();
        let mut coords = vec![LatticeCoord::new(7, 7); truth.len()];
        let changed = CoordinateAssigner::new(4).assign_active(
            &points,
            &[0, 1, 3],
            &basis,
            &mut coords,
            ParallelAssignOptions::disabled(),
        );
        assert_eq!(changed, 3);
        assert_eq!(coords[0], truth[0]);
        assert_eq!(coords[1], truth[1]);
        assert_eq!(coords[3], truth[3]);
        assert_eq!(coords[2], LatticeCoord::new(7, 7));
        assert_eq!(coords[4], LatticeCoord::new(7, 7));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_toggle_matches_sequential_result() {
        let basis = skewed();
        let pts: Vec<[f64; 2]> = (0..12)
            .map(|k| {
                let c = LatticeCoord::new(k % 4 - 1, k / 4 - 1);
                let p = basis.reconstruct(c) + Vector2::new(0.05 * f64::from(k % 3), -0.04);
                [p.x, p.y]
            })
            .collect();
        let points = PointSet::from_points(&pts).unwrap();
        let active: Vec<usize> = (0..points.len()).collect();
        let assigner = CoordinateAssigner::new(5);

        let mut seq = vec![LatticeCoord::ZERO; points.len()];
        assigner.assign_active(
            &points,
            &active,
            &basis,
            &mut seq,
            ParallelAssignOptions::disabled(),
        );
        let mut par = vec![LatticeCoord::ZERO; points.len()];
        assigner.assign_active(
            &points,
            &active,
            &basis,
            &mut par,
            ParallelAssignOptions::new(true, 1),
        );
        assert_eq!(seq, par);
    }
}
