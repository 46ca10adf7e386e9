//! Raster bounds reader capability.
//!
//! Reading a raster header is the job of an external raster I/O layer. The
//! grid builder only needs the bounding box and CRS, so it depends on the
//! [`BoundsReader`] trait rather than on any particular raster library.

use std::collections::HashMap;

use super::error::FootprintError;
use super::types::Bounds;

/// Bounding box of a raster together with the CRS it is expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBounds {
    pub bounds: Bounds,
    pub crs: String,
}

impl RasterBounds {
    pub fn new(bounds: Bounds, crs: impl Into<String>) -> Self {
        Self {
            bounds,
            crs: crs.into(),
        }
    }
}

/// Reads the native bounding box of a raster asset.
///
/// Implementations must be shareable across threads: grids for several
/// assets may be built concurrently.
pub trait BoundsReader: Send + Sync {
    fn read_bounds(&self, url: &str) -> Result<RasterBounds, FootprintError>;
}

/// Bounds reader backed by a map of pre-read bounds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBoundsReader {
    entries: HashMap<String, RasterBounds>,
}

impl InMemoryBoundsReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bounds for a URL, replacing any previous entry.
    pub fn insert(&mut self, url: impl Into<String>, bounds: RasterBounds) {
        self.entries.insert(url.into(), bounds);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, url: impl Into<String>, bounds: RasterBounds) -> Self {
        self.insert(url, bounds);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BoundsReader for InMemoryBoundsReader {
    fn read_bounds(&self, url: &str) -> Result<RasterBounds, FootprintError> {
        self.entries
            .get(url)
            .cloned()
            .ok_or_else(|| FootprintError::BoundsUnavailable {
                url: url.to_string(),
                reason: "no bounds recorded for this asset".to_string(),
            })
    }
}
