//! Partition data model.

use geo::{Area, Polygon};
use serde::{Deserialize, Serialize};

use crate::footprint::Bounds;

/// One input sub-cell covering a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub asset_url: String,
    pub sub_id: String,
    /// Bounds of the (post-split) sub-cell.
    pub sub_bounds: Bounds,
}

/// A region of the partition with the sub-cells whose union covers it.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: usize,
    pub geometry: Polygon<f64>,
    /// Sorted by `(asset_url, sub_id)`, without duplicates.
    pub sources: Vec<SourceRef>,
}

impl Region {
    pub fn area(&self) -> f64 {
        self.geometry.unsigned_area()
    }

    /// Whether the region is covered by more than one sub-cell.
    pub fn is_shared(&self) -> bool {
        self.sources.len() > 1
    }
}

/// One row of the region → source join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSourceRow {
    pub region_id: usize,
    pub asset_url: String,
    pub sub_id: String,
}

/// Region with list-valued attribution columns, one row per geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionRecord {
    pub region_id: usize,
    pub geometry: Polygon<f64>,
    pub fused_sub_id: Vec<String>,
    pub url: Vec<String>,
    pub sub_bounds: Vec<[f64; 4]>,
}

/// The deduplicated, attributed set of disjoint regions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub regions: Vec<Region>,
    /// `false` when the resolver ran out of rounds and area may be missing.
    pub complete: bool,
    /// Resolver rounds executed.
    pub rounds: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn total_area(&self) -> f64 {
        self.regions.iter().map(Region::area).sum()
    }

    /// Normalized one-to-many attribution: one row per (region, source).
    pub fn join_table(&self) -> Vec<RegionSourceRow> {
        self.regions
            .iter()
            .flat_map(|region| {
                region.sources.iter().map(move |source| RegionSourceRow {
                    region_id: region.id,
                    asset_url: source.asset_url.clone(),
                    sub_id: source.sub_id.clone(),
                })
            })
            .collect()
    }

    /// List-valued table: `geometry`, `fused_sub_id`, `url`, `sub_bounds`.
    pub fn records(&self) -> Vec<PartitionRecord> {
        self.regions
            .iter()
            .map(|region| PartitionRecord {
                region_id: region.id,
                geometry: region.geometry.clone(),
                fused_sub_id: region.sources.iter().map(|s| s.sub_id.clone()).collect(),
                url: region.sources.iter().map(|s| s.asset_url.clone()).collect(),
                sub_bounds: region.sources.iter().map(|s| s.sub_bounds.as_array()).collect(),
            })
            .collect()
    }

    /// Regions attributed to a given asset.
    pub fn regions_for_asset<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Region> + 'a {
        self.regions
            .iter()
            .filter(move |r| r.sources.iter().any(|s| s.asset_url == url))
    }
}
