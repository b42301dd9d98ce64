use super::simplex::SimplexParams;
use crate::types::LatticeBasis;
use serde::{Deserialize, Serialize};

/// Parameters controlling the geometric refinement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineParams {
    /// Nelder–Mead budget and tolerances.
    pub simplex: SimplexParams,
    /// Refined bases with `|sin(v1, v2)|` below this are rejected as degenerate.
    pub min_basis_sine: f64,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            simplex: SimplexParams::default(),
            min_basis_sine: 1e-6,
        }
    }
}

/// How a refinement call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefineStatus {
    /// Both simplex tolerances were met.
    Converged,
    /// The simplex budget ran out; the best vertex was adopted anyway.
    BudgetExhausted,
    /// The optimum was degenerate; the warm start was kept.
    DegenerateRejected,
}

/// Result of one refinement call.
#[derive(Clone, Debug)]
pub struct RefineOutcome {
    /// Hypothesis to carry into the next growth iteration.
    pub basis: LatticeBasis,
    /// Total squared reconstruction error of `basis` over the active samples.
    pub total_sq_err: f64,
    pub status: RefineStatus,
    pub iterations: usize,
    pub evaluations: usize,
}
