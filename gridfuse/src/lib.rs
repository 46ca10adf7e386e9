//! gridfuse - non-overlapping partitions of overlapping raster footprints
//!
//! Every raster asset's footprint is cut into a fixed sub-grid. Sub-cells of
//! different assets overlap; this library reduces them to a set of pairwise
//! interior-disjoint regions, each attributed to every sub-cell covering it.
//!
//! # High-Level API
//!
//! The [`pipeline`] module runs all stages:
//!
//! ```
//! use gridfuse::footprint::{AssetSpec, Bounds, GridShape, InMemoryBoundsReader, RasterBounds};
//! use gridfuse::overlay::GeoOverlay;
//! use gridfuse::pipeline::PartitionPipeline;
//!
//! let reader = InMemoryBoundsReader::new()
//!     .with("a.tif", RasterBounds::new(Bounds::new(0.0, 0.0, 2.0, 2.0), "EPSG:4326"))
//!     .with("b.tif", RasterBounds::new(Bounds::new(1.0, 1.0, 3.0, 3.0), "EPSG:4326"));
//! let assets = [
//!     AssetSpec::new("a.tif", GridShape::new(1, 1)),
//!     AssetSpec::new("b.tif", GridShape::new(1, 1)),
//! ];
//!
//! let report = PartitionPipeline::new(GeoOverlay::default())
//!     .run(&assets, &reader)
//!     .unwrap();
//! assert_eq!(report.partition.len(), 3);
//! ```

pub mod antimeridian;
pub mod config;
pub mod footprint;
pub mod logging;
pub mod overlay;
pub mod partition;
pub mod pipeline;
pub mod resolver;

/// Version of the gridfuse library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
