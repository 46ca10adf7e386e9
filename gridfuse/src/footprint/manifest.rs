//! JSON asset manifest.
//!
//! A manifest lists the assets to partition and, optionally, their pre-read
//! bounds:
//!
//! ```json
//! {
//!   "assets": [
//!     { "url": "s3://bucket/a.tif", "bounds": [0, 0, 2, 2], "crs": "EPSG:4326", "grid": [4, 4] },
//!     { "url": "s3://bucket/b.tif", "bounds": [1, 1, 3, 3] }
//!   ]
//! }
//! ```
//!
//! Entries without `bounds` still become assets; reading them fails later
//! with an asset-level error, leaving the other assets unaffected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::FootprintError;
use super::reader::{InMemoryBoundsReader, RasterBounds};
use super::types::{AssetSpec, Bounds, GridShape};

/// One asset entry of the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridShape>,
}

/// The full manifest file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub assets: Vec<ManifestEntry>,
}

impl AssetManifest {
    /// Load a manifest from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, FootprintError> {
        let content = std::fs::read_to_string(path).map_err(|e| FootprintError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| FootprintError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Split the manifest into asset requests and a reader over the recorded bounds.
    ///
    /// Entries without a grid use `default_grid`; entries without a CRS are
    /// assumed to be in `default_crs`.
    pub fn into_parts(
        self,
        default_grid: GridShape,
        default_crs: &str,
    ) -> (Vec<AssetSpec>, InMemoryBoundsReader) {
        let mut reader = InMemoryBoundsReader::new();
        let specs = self
            .assets
            .into_iter()
            .map(|entry| {
                if let Some(bounds) = entry.bounds {
                    let crs = entry.crs.unwrap_or_else(|| default_crs.to_string());
                    reader.insert(entry.url.clone(), RasterBounds::new(bounds, crs));
                }
                AssetSpec::new(entry.url, entry.grid.unwrap_or(default_grid))
            })
            .collect();
        (specs, reader)
    }
}
