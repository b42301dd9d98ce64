//! Growth loop driving the lattice estimate end-to-end.
//!
//! The [`LatticeDenoiser`] exposes a small API: feed a [`PointSet`] and get
//! the integer coordinate of every point together with the refined basis.
//! Internally it computes pairwise distances, seeds a hypothesis at the
//! medoid, then grows the active set one point at a time in proximity order.
//! Each iteration re-assigns every active point against the current basis and
//! warm-starts a simplex refinement from it.
//!
//! Typical usage:
//! ```
//! use lattice_denoise::{LatticeDenoiser, PointSet};
//!
//! let points = PointSet::from_points(&[
//!     [0.02, -0.01], [1.01, 0.0], [-0.98, 0.03],
//!     [0.0, 1.02], [0.01, -0.99], [1.0, 1.01],
//! ]).unwrap();
//! let report = LatticeDenoiser::default().process_with_diagnostics(&points);
//! assert_eq!(report.fit.coords.len(), points.len());
//! assert_eq!(report.iterations.len(), points.len() - 3);
//! ```

use crate::assign::CoordinateAssigner;
use crate::diagnostics::{elapsed_ms, DenoiseReport, IterationTrace, TimingBreakdown};
use crate::distance::DistanceMatrix;
use crate::error::LatticeError;
use crate::params::DenoiseParams;
use crate::points::{PointSet, MIN_POINTS};
use crate::refine::Refiner;
use crate::seed::SeedSelection;
use crate::types::{LatticeBasis, LatticeCoord, LatticeFit};
use log::{debug, info};
use std::time::Instant;

/// State visible to an [`IterationObserver`] after one growth iteration.
pub struct IterationSnapshot<'a> {
    /// Size of the active subset, equal to `active.len()`.
    pub iteration: usize,
    /// Active point indices in proximity order.
    pub active: &'a [usize],
    /// Current coordinates for all points. Inactive entries stay `(0, 0)`
    /// until the point joins the active set.
    pub coords: &'a [LatticeCoord],
    pub basis: &'a LatticeBasis,
    pub points: &'a PointSet,
    pub trace: &'a IterationTrace,
}

/// Hook called once per growth iteration.
pub trait IterationObserver {
    fn on_iteration(&mut self, snapshot: &IterationSnapshot<'_>);
}

impl<F> IterationObserver for F
where
    F: FnMut(&IterationSnapshot<'_>),
{
    fn on_iteration(&mut self, snapshot: &IterationSnapshot<'_>) {
        self(snapshot)
    }
}

struct NoopObserver;

impl IterationObserver for NoopObserver {
    fn on_iteration(&mut self, _snapshot: &IterationSnapshot<'_>) {}
}

/// Incremental lattice denoiser.
pub struct LatticeDenoiser {
    params: DenoiseParams,
    refiner: Refiner,
}

impl LatticeDenoiser {
    pub fn new(params: DenoiseParams) -> Self {
        let refiner = Refiner::new(params.refine.clone());
        Self { params, refiner }
    }

    pub fn params(&self) -> &DenoiseParams {
        &self.params
    }

    /// Run the growth loop and return only the final fit.
    pub fn process(&self, points: &PointSet) -> LatticeFit {
        self.process_with_diagnostics(points).fit
    }

    /// Run the growth loop and return the fit with per-iteration traces.
    pub fn process_with_diagnostics(&self, points: &PointSet) -> DenoiseReport {
        self.process_with_observer(points, &mut NoopObserver)
    }

    /// Like [`process_with_diagnostics`](Self::process_with_diagnostics), but
    /// calls `observer` after every iteration.
    pub fn process_with_observer<O>(&self, points: &PointSet, observer: &mut O) -> DenoiseReport
    where
        O: IterationObserver + ?Sized,
    {
        let n = points.len();
        debug!("LatticeDenoiser::process start n={}", n);
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();

        let stage_start = Instant::now();
        let distances = DistanceMatrix::from_points(points);
        timing.record("distances", stage_start);

        let stage_start = Instant::now();
        let seed = SeedSelection::from_distances(points, &distances);
        timing.record("seed", stage_start);
        debug!(
            "seed: origin={} neighbor={:?} v1=({:.4}, {:.4})",
            seed.origin_index, seed.neighbor_index, seed.basis.v1.x, seed.basis.v1.y
        );

        let growth_start = Instant::now();
        let mut basis = seed.basis;
        let mut coords = vec![LatticeCoord::ZERO; n];
        let mut total_sq_err = 0.0;
        let mut iterations = Vec::with_capacity(n.saturating_sub(MIN_POINTS - 1));

        for it in MIN_POINTS..=n {
            let iter_start = Instant::now();
            let active = &seed.order[..it];
            let bound = i32::try_from(it).unwrap_or(i32::MAX);
            let assigner = CoordinateAssigner::new(bound).with_origin_eps(self.params.origin_eps);
            let reassigned =
                assigner.assign_active(points, active, &basis, &mut coords, self.params.parallel);

            let outcome = self.refiner.refine_active(&basis, points, active, &coords);
            basis = outcome.basis;
            total_sq_err = outcome.total_sq_err;

            let trace = IterationTrace {
                active: it,
                reassigned,
                total_sq_err,
                status: outcome.status,
                simplex_iterations: outcome.iterations,
                evaluations: outcome.evaluations,
                elapsed_ms: elapsed_ms(iter_start),
            };
            debug!(
                "iteration {}: reassigned={} err={:.6e} status={:?} evals={}",
                it, reassigned, total_sq_err, trace.status, trace.evaluations
            );
            observer.on_iteration(&IterationSnapshot {
                iteration: it,
                active,
                coords: &coords,
                basis: &basis,
                points,
                trace: &trace,
            });
            iterations.push(trace);
        }
        timing.record("growth", growth_start);
        timing.total_ms = elapsed_ms(total_start);

        let fit = LatticeFit {
            coords,
            basis,
            total_sq_err,
        };
        info!(
            "LatticeDenoiser: n={} iterations={} err={:.6e} total_ms={:.3}",
            n,
            iterations.len(),
            fit.total_sq_err,
            timing.total_ms
        );

        DenoiseReport {
            fit,
            seed,
            iterations,
            timing,
        }
    }
}

impl Default for LatticeDenoiser {
    fn default() -> Self {
        Self::new(DenoiseParams::default())
    }
}

/// Validates `x`/`y` and runs the denoiser with default parameters.
pub fn denoise_lattice(xs: &[f64], ys: &[f64]) -> Result<LatticeFit, LatticeError> {
    let points = PointSet::from_xy(xs, ys)?;
    Ok(LatticeDenoiser::default().process(&points))
}
