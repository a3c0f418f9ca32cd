//! Error types for surface construction and model loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building an animated surface
#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    /// Grid or extent parameters are unusable; fix the config and reconstruct
    #[error("invalid surface config: {0}")]
    InvalidConfig(String),
}

/// Failure reported by the background model loader
#[derive(Debug, Error)]
pub enum AssetLoadFailure {
    #[error("failed to import model {path:?}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model {path:?} contains no triangle geometry")]
    NoGeometry { path: PathBuf },

    /// Loader thread exited without reporting a result
    #[error("model loader thread disconnected")]
    Disconnected,
}
