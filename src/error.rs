use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the loaders and the projection core.
///
/// Loader errors carry the offending path; rendering skips and navigation
/// boundary hits are normal outcomes and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{}: no usable entries", .path.display())]
    EmptyInput { path: PathBuf },

    #[error("{}: {}", .path.display(), .reason)]
    Malformed { path: PathBuf, reason: String },

    #[error("{}: invalid JSON: {}", .path.display(), .source)]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: unexpected structure: {}", .path.display(), .reason)]
    TypeMismatch { path: PathBuf, reason: String },

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
