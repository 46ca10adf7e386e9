//! The final partition: deduplicated regions with source attribution.
//!
//! [`PartitionDeduplicator`] turns the resolver's disjoint polygons into
//! [`Region`]s, each listing the sub-cells whose union covers it. A
//! [`Partition`] can be viewed as a normalized join table or as list-valued
//! records, and written as GeoJSON.

mod dedupe;
mod types;
mod writer;

pub use dedupe::PartitionDeduplicator;
pub use types::{Partition, PartitionRecord, Region, RegionSourceRow, SourceRef};
pub use writer::{polygon_geometry, to_geojson, write_geojson, write_join_table, WriteError};
