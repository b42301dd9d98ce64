//! Parameter types configuring the denoiser stages.
//!
//! Defaults reproduce the reference behaviour: a 1e-3 origin-coincidence
//! radius for the assigner, a Nelder–Mead budget of 1000 iterations / 2000
//! evaluations with 1e-8 tolerances, and sequential assignment.

use crate::assign::{ParallelAssignOptions, ORIGIN_EPS};
use crate::refine::RefineParams;
use serde::{Deserialize, Serialize};

/// Denoiser-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseParams {
    /// Points closer than this to the current origin get `λ = (0, 0)`.
    pub origin_eps: f64,
    /// Geometric refinement (simplex budget, degeneracy threshold).
    pub refine: RefineParams,
    /// Optional Rayon fan-out of the per-point assignment.
    pub parallel: ParallelAssignOptions,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            origin_eps: ORIGIN_EPS,
            refine: RefineParams::default(),
            parallel: ParallelAssignOptions::default(),
        }
    }
}
