//! File helpers: measurement loading and JSON report output.

use crate::error::LatticeError;
use crate::points::PointSet;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Loads measurements from a JSON file.
///
/// Accepts a `2 x n` nested array (`[[x0, x1, ...], [y0, y1, ...]]`) or an
/// object `{"x": [...], "y": [...]}`.
pub fn load_points(path: &Path) -> Result<PointSet, LatticeError> {
    let contents = fs::read_to_string(path).map_err(|source| LatticeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| LatticeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PointSet::from_json_value(&value)?)
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), LatticeError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| LatticeError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| LatticeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), LatticeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| LatticeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
