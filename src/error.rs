//! Error taxonomy.
//!
//! Only input validation and the JSON helpers can fail. Once a [`PointSet`]
//! exists the growth loop always produces a fit; degenerate refinements and
//! optimizer budget exhaustion are reported through the iteration trace
//! instead (see [`RefineStatus`]).
//!
//! [`PointSet`]: crate::points::PointSet
//! [`RefineStatus`]: crate::refine::RefineStatus

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a measurement set is rejected before any computation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The input is not laid out as two coordinate rows (x and y).
    #[error("input must be a 2 x n array, got {rows} row(s)")]
    Shape { rows: usize },
    /// The x and y rows disagree on the number of points.
    #[error("x and y rows must have equal length, got {x} and {y}")]
    LengthMismatch { x: usize, y: usize },
    /// Not enough points to seed the first growth iteration.
    #[error("at least {min} points are required, got {got}")]
    TooFewPoints { got: usize, min: usize },
    /// A JSON entry is not a number.
    #[error("entry at row {row}, column {col} is not numeric")]
    NonNumeric { row: usize, col: usize },
    /// A coordinate is NaN or infinite.
    #[error("point {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    /// The JSON document is neither nested arrays nor an `{x, y}` object.
    #[error("expected a 2 x n JSON array or an object with \"x\" and \"y\" arrays")]
    UnsupportedJson,
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum LatticeError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to (de)serialize JSON for {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl LatticeError {
    /// Returns the validation failure when this is an input error.
    pub fn as_input_error(&self) -> Option<&InputError> {
        match self {
            Self::InvalidInput(err) => Some(err),
            _ => None,
        }
    }
}
