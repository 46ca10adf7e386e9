//! Errors raised while opening an asset and building its sub-grid.
//!
//! Every variant is fatal for the asset it concerns and for that asset only.

use std::path::PathBuf;

use thiserror::Error;

use super::types::{Bounds, GridShape};

/// Failure to produce sub-cells for one asset.
#[derive(Debug, Clone, Error)]
pub enum FootprintError {
    /// The raster bounds could not be read at all.
    #[error("Cannot read bounds for asset '{url}': {reason}")]
    BoundsUnavailable { url: String, reason: String },

    /// The bounds were read but describe an empty or non-finite box.
    #[error("Asset '{url}' has invalid bounds {bounds}")]
    InvalidBounds { url: String, bounds: Bounds },

    /// A grid dimension is zero.
    #[error("Asset '{url}' has invalid grid {grid}: both dimensions must be positive")]
    InvalidGrid { url: String, grid: GridShape },

    /// The raster is not in the CRS the partition is computed in.
    #[error("Asset '{url}' is in {found}, expected {expected}")]
    CrsMismatch {
        url: String,
        expected: String,
        found: String,
    },

    /// The asset manifest could not be loaded.
    #[error("Failed to load manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
}

impl FootprintError {
    /// URL of the asset the error concerns, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::BoundsUnavailable { url, .. }
            | Self::InvalidBounds { url, .. }
            | Self::InvalidGrid { url, .. }
            | Self::CrsMismatch { url, .. } => Some(url),
            Self::Manifest { .. } => None,
        }
    }
}
