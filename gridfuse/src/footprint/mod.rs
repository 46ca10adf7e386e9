//! Raster footprints and their fixed sub-grids.
//!
//! Each raster asset is reduced to its bounding box (read through a
//! [`BoundsReader`]) and cut into an `nx × ny` grid of [`SubCell`]s with ids
//! `"{i}_{j}"`. Failing to read one asset never affects the others.
//!
//! ```
//! use gridfuse::footprint::{
//!     AssetSpec, Bounds, FootprintGridBuilder, GridShape, InMemoryBoundsReader, RasterBounds,
//! };
//!
//! let reader = InMemoryBoundsReader::new()
//!     .with("a.tif", RasterBounds::new(Bounds::new(0.0, 0.0, 2.0, 2.0), "EPSG:4326"));
//! let cells = FootprintGridBuilder::new()
//!     .build(&AssetSpec::new("a.tif", GridShape::new(2, 2)), &reader)
//!     .unwrap();
//! assert_eq!(cells.len(), 4);
//! assert_eq!(cells[0].sub_id, "0_0");
//! ```

mod error;
mod grid;
mod manifest;
mod reader;
mod types;

pub use error::FootprintError;
pub use grid::{subdivide, FootprintGridBuilder};
pub use manifest::{AssetManifest, ManifestEntry};
pub use reader::{BoundsReader, InMemoryBoundsReader, RasterBounds};
pub use types::{Asset, AssetSpec, Bounds, GridShape, SubCell, ANTIMERIDIAN};
