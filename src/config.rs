//! JSON runtime configuration for the `lattice_demo` binary.

use crate::error::LatticeError;
use crate::params::DenoiseParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Destination for the JSON report; stdout when absent.
    pub json_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// JSON file holding the measurements (see [`crate::io::load_points`]).
    pub input: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: DenoiseParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, LatticeError> {
    let contents = fs::read_to_string(path).map_err(|source| LatticeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RuntimeConfig =
        serde_json::from_str(&contents).map_err(|source| LatticeError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}
