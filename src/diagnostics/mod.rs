//! Diagnostics data model returned by [`LatticeDenoiser::process_with_diagnostics`].
//!
//! [`DenoiseReport`] bundles the final fit with the seed that started the
//! growth loop and one [`IterationTrace`] per growth iteration. Everything
//! serializes to camelCase JSON for external tooling (plotters, dashboards).
//!
//! [`LatticeDenoiser::process_with_diagnostics`]: crate::LatticeDenoiser::process_with_diagnostics

mod timing;

pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};

use crate::refine::RefineStatus;
use crate::seed::SeedSelection;
use crate::types::LatticeFit;
use serde::Serialize;

/// Summary of one growth iteration.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationTrace {
    /// Size of the active subset (`it`).
    pub active: usize,
    /// Active points whose integer coordinate changed during assignment.
    pub reassigned: usize,
    /// Total squared reconstruction error after refinement.
    pub total_sq_err: f64,
    pub status: RefineStatus,
    pub simplex_iterations: usize,
    pub evaluations: usize,
    pub elapsed_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenoiseReport {
    pub fit: LatticeFit,
    pub seed: SeedSelection,
    pub iterations: Vec<IterationTrace>,
    pub timing: TimingBreakdown,
}

impl DenoiseReport {
    /// Iterations whose refined basis was rejected as degenerate.
    pub fn degenerate_fallbacks(&self) -> usize {
        self.count_status(RefineStatus::DegenerateRejected)
    }

    /// Iterations that ran out of simplex budget.
    pub fn budget_exhaustions(&self) -> usize {
        self.count_status(RefineStatus::BudgetExhausted)
    }

    fn count_status(&self, status: RefineStatus) -> usize {
        self.iterations.iter().filter(|t| t.status == status).count()
    }
}
