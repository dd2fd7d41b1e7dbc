//! Error type for the fallible edges of the crate: disk and config I/O, and
//! externally supplied classifier coefficients.
//!
//! Detection itself never fails: absence of a result is reported as empty
//! output, and caller contract violations are assertions.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to open image {path}: {source}")]
    ImageOpen {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("image {path} has zero width or height")]
    EmptyImage { path: PathBuf },
    #[error("invalid classifier coefficients: {reason}")]
    Coefficients { reason: String },
}

pub type Result<T> = std::result::Result<T, DetectorError>;
