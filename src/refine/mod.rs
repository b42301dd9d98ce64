//! Geometric refinement of the lattice hypothesis.
//!
//! With the integer coordinates of the active points held fixed, the
//! refiner minimises the total squared reconstruction error
//! `Σ ‖origin + i·v1 + j·v2 − p‖²` over the six scalars of
//! `(origin, v1, v2)`:
//!
//! - [`cost`] evaluates the functional on packed parameters.
//! - [`simplex`] is the derivative-free Nelder–Mead minimiser, warm-started
//!   from the previous hypothesis.
//! - [`Refiner`] wraps both and applies the degenerate-basis policy: a
//!   refined basis whose vectors are (nearly) parallel is discarded and the
//!   warm start is kept for the next iteration.
//!
//! Convergence is best effort. An exhausted simplex budget is not an error;
//! the best vertex found is used and the outcome is tagged accordingly.

pub mod cost;
pub mod simplex;
mod types;

pub use cost::{gather_samples, reconstruction_cost, Sample};
pub use simplex::{minimize, SimplexParams, SimplexResult};
pub use types::{RefineOutcome, RefineParams, RefineStatus};

use crate::points::PointSet;
use crate::types::{LatticeBasis, LatticeCoord};
use log::{debug, warn};

/// Warm-started least-squares refiner for `(origin, v1, v2)`.
pub struct Refiner {
    params: RefineParams,
}

impl Refiner {
    /// Creates a refiner with the supplied hyper-parameters.
    pub fn new(params: RefineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RefineParams {
        &self.params
    }

    /// Refines `warm_start` against the active points and their coordinates.
    pub fn refine_active(
        &self,
        warm_start: &LatticeBasis,
        points: &PointSet,
        active: &[usize],
        coords: &[LatticeCoord],
    ) -> RefineOutcome {
        let samples = gather_samples(points, active, coords);
        self.refine(warm_start, &samples)
    }

    /// Refines `warm_start` against pre-gathered samples.
    pub fn refine(&self, warm_start: &LatticeBasis, samples: &[Sample]) -> RefineOutcome {
        let result = simplex::minimize(
            |x| cost::packed_cost(x, samples),
            warm_start.to_params(),
            &self.params.simplex,
        );
        let candidate = LatticeBasis::from_params(&result.x);

        if candidate.is_degenerate(self.params.min_basis_sine) {
            warn!(
                "Refiner: degenerate basis (sine={:.3e}) over {} samples, keeping warm start",
                candidate.basis_sine(),
                samples.len()
            );
            return RefineOutcome {
                basis: *warm_start,
                total_sq_err: reconstruction_cost(warm_start, samples),
                status: RefineStatus::DegenerateRejected,
                iterations: result.iterations,
                evaluations: result.evaluations,
            };
        }

        let status = if result.converged {
            RefineStatus::Converged
        } else {
            debug!(
                "Refiner: simplex budget exhausted after {} iterations / {} evaluations (fx={:.6e})",
                result.iterations, result.evaluations, result.fx
            );
            RefineStatus::BudgetExhausted
        };

        RefineOutcome {
            basis: candidate,
            total_sq_err: result.fx,
            status,
            iterations: result.iterations,
            evaluations: result.evaluations,
        }
    }
}

impl Default for Refiner {
    fn default() -> Self {
        Self::new(RefineParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn grid_samples(basis: &LatticeBasis) -> Vec<Sample> {
        let mut samples = Vec::new();
        for j in -1..=1 {
            for i in -1..=1 {
                let coord = LatticeCoord::new(i, j);
                samples.push(Sample {
                    point: basis.reconstruct(coord),
                    coord,
                });
            }
        }
        samples
    }

    fn truth() -> LatticeBasis {
        LatticeBasis::new(
            Vector2::new(0.3, -0.1),
            Vector2::new(1.0, 0.2),
            Vector2::new(-0.2, 1.0),
        )
    }

    #[test]
    fn recovers_exact_basis_from_perturbed_warm_start() {
        let truth = truth();
        let samples = grid_samples(&truth);
        let warm = LatticeBasis::new(
            truth.origin + Vector2::new(0.05, -0.04),
            truth.v1 + Vector2::new(-0.03, 0.02),
            truth.v2 + Vector2::new(0.04, 0.01),
        );
        let outcome = Refiner::default().refine(&warm, &samples);
        assert_eq!(outcome.status, RefineStatus::Converged);
        assert!(outcome.total_sq_err < 1e-8);
        assert!((outcome.basis.origin - truth.origin).norm() < 1e-3);
        assert!((outcome.basis.v1 - truth.v1).norm() < 1e-3);
        assert!((outcome.basis.v2 - truth.v2).norm() < 1e-3);
    }

    #[test]
    fn degenerate_optimum_keeps_warm_start() {
        let truth = truth();
        let samples = grid_samples(&truth);
        // No basis can reach a sine above one, so every result is rejected.
        let refiner = Refiner::new(RefineParams {
            min_basis_sine: 1.5,
            ..Default::default()
        });
        let outcome = refiner.refine(&truth, &samples);
        assert_eq!(outcome.status, RefineStatus::DegenerateRejected);
        assert_eq!(outcome.basis, truth);
        assert!(outcome.total_sq_err < 1e-20);
    }

    #[test]
    fn exhausted_budget_is_a_soft_outcome() {
        let truth = truth();
        let samples = grid_samples(&truth);
        let warm = LatticeBasis::new(
            truth.origin + Vector2::new(0.2, 0.2),
            truth.v1,
            truth.v2,
        );
        let refiner = Refiner::new(RefineParams {
            simplex: SimplexParams {
                max_evaluations: 20,
                ..Default::default()
            },
            ..Default::default()
        });
        let outcome = refiner.refine(&warm, &samples);
        assert_eq!(outcome.status, RefineStatus::BudgetExhausted);
        assert!(outcome.total_sq_err <= reconstruction_cost(&warm, &samples));
    }

    #[test]
    fn refine_active_uses_only_active_indices() {
        let truth = truth();
        let mut pts: Vec<[f64; 2]> = grid_samples(&truth)
            .iter()
            .map(|s| [s.point.x, s.point.y])
            .collect();
        // An inactive point far off the lattice must not influence the fit.
        pts.push([50.0, -50.0]);
        let points = PointSet::from_points(&pts).unwrap();
        let mut coords: Vec<LatticeCoord> = grid_samples(&truth).iter().map(|s| s.coord).collect();
        coords.push(LatticeCoord::ZERO);
        let active: Vec<usize> = (0..9).collect();

        let outcome = Refiner::default().refine_active(&truth, &points, &active, &coords);
        assert!(outcome.total_sq_err < 1e-12);
        assert!((outcome.basis.v1 - truth.v1).norm() < 1e-6);
    }
}
