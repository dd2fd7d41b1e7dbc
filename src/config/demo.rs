use crate::detector::DetectorParams;
use crate::error::{DetectorError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Detection report destination.
    pub json_out: Option<PathBuf>,
    /// Feature vectors of the digit crops.
    pub crops_json: Option<PathBuf>,
    /// Directory receiving one PNG per digit crop.
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DemoConfig {
    pub input_path: PathBuf,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub detector: DetectorParams,
}

pub fn load_config(path: &Path) -> Result<DemoConfig> {
    let contents = fs::read_to_string(path).map_err(|source| DetectorError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents, path)
}

fn parse_config(contents: &str, path: &Path) -> Result<DemoConfig> {
    serde_json::from_str(contents).map_err(|source| DetectorError::Config {
        path: path.to_path_buf(),
        source,
    })
}
