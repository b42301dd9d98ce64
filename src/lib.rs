#![doc = include_str!("../README.md")]

// Public modules
pub mod denoiser;
pub mod diagnostics;
pub mod error;
pub mod params;
pub mod points;
pub mod types;

// Stage-level building blocks, public for tools and experiments.
pub mod assign;
pub mod distance;
pub mod refine;
pub mod seed;

// File helpers used by the demo binary.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

pub use crate::denoiser::{
    denoise_lattice, IterationObserver, IterationSnapshot, LatticeDenoiser,
};
pub use crate::error::{InputError, LatticeError};
pub use crate::params::DenoiseParams;
pub use crate::points::PointSet;
pub use crate::types::{LatticeBasis, LatticeCoord, LatticeFit};

pub use crate::diagnostics::{DenoiseReport, IterationTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```
/// use lattice_denoise::prelude::*;
///
/// # fn main() -> Result<(), LatticeError> {
/// let xs = [0.0, 1.02, -0.99, 0.01, 0.0];
/// let ys = [0.01, 0.0, 0.02, 0.98, -1.01];
/// let fit: LatticeFit = denoise_lattice(&xs, &ys)?;
/// assert_eq!(fit.coords.len(), xs.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::{
        denoise_lattice, DenoiseParams, LatticeCoord, LatticeDenoiser, LatticeError, LatticeFit,
        PointSet,
    };
}

// --- Stage-level API -------------------------------------------------------

pub mod stages {
    pub use crate::assign::{assign_coordinate, CoordinateAssigner, ParallelAssignOptions};
    pub use crate::distance::DistanceMatrix;
    pub use crate::refine::{
        minimize, RefineOutcome, RefineParams, RefineStatus, Refiner, SimplexParams,
    };
    pub use crate::seed::{perpendicular, proximity_order, select_origin, SeedSelection};

    pub use crate::diagnostics::{StageTiming, TimingBreakdown};
}
