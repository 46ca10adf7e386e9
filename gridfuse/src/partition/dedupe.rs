//! Attribution of resolved regions back to the sub-cells that cover them.

use std::collections::BTreeMap;

use geo::Polygon;
use rstar::{RTree, RTreeObject, AABB};
use tracing::{debug, warn};

use super::types::{Region, SourceRef};
use crate::footprint::SubCell;
use crate::overlay::{CanonicalKey, GeometryOps};

/// Envelope of a sub-cell, keyed by its position in the cell slice.
#[derive(Clone)]
struct CellBox {
    idx: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for CellBox {
    type Envelope = AABB<[f64; 2]>;

    #[inline]
    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

/// Collapses equal regions and attaches the covering sub-cells to each.
///
/// Regions are grouped by canonical geometry. For each group a point strictly
/// inside the region is looked up against the sub-cells; a resolved region is
/// either inside a sub-cell or disjoint from it, so the cells strictly
/// containing that point are exactly the ones covering the region.
#[derive(Debug, Clone)]
pub struct PartitionDeduplicator<'a, O> {
    ops: &'a O,
}

impl<'a, O: GeometryOps> PartitionDeduplicator<'a, O> {
    pub fn new(ops: &'a O) -> Self {
        Self { ops }
    }

    /// Produce the attributed regions, ordered by canonical geometry with
    /// sequential ids starting at 0.
    pub fn deduplicate(&self, regions: &[Polygon<f64>], cells: &[SubCell]) -> Vec<Region> {
        let tree = RTree::bulk_load(
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.bounds.is_valid())
                .map(|(idx, cell)| CellBox {
                    idx,
                    env: AABB::from_corners(
                        [cell.bounds.minx, cell.bounds.miny],
                        [cell.bounds.maxx, cell.bounds.maxy],
                    ),
                })
                .collect(),
        );

        let mut groups: BTreeMap<CanonicalKey, &Polygon<f64>> = BTreeMap::new();
        for polygon in regions {
            match self.ops.canonical_key(polygon) {
                Ok(key) => {
                    groups.entry(key).or_insert(polygon);
                }
                Err(error) => warn!(%error, "Skipping region without a canonical form"),
            }
        }
        let duplicates = regions.len() - groups.len();

        let attributed: Vec<Region> = groups
            .into_values()
            .enumerate()
            .map(|(id, polygon)| Region {
                id,
                geometry: polygon.clone(),
                sources: self.covering_cells(polygon, cells, &tree),
            })
            .collect();

        let unattributed = attributed.iter().filter(|r| r.sources.is_empty()).count();
        if unattributed > 0 {
            warn!(unattributed, "Regions not covered by any sub-cell");
        }
        debug!(
            regions = attributed.len(),
            duplicates, "Deduplicated partition"
        );
        attributed
    }

    fn covering_cells(
        &self,
        polygon: &Polygon<f64>,
        cells: &[SubCell],
        tree: &RTree<CellBox>,
    ) -> Vec<SourceRef> {
        let Some(point) = self.ops.representative_point(polygon) else {
            return Vec::new();
        };
        let (x, y) = (point.x(), point.y());

        let mut sources: Vec<SourceRef> = tree
            .locate_in_envelope_intersecting(&AABB::from_point([x, y]))
            .map(|b| &cells[b.idx])
            .filter(|cell| cell.bounds.contains_strict(x, y))
            .map(|cell| SourceRef {
                asset_url: cell.asset_url.clone(),
                sub_id: cell.sub_id.clone(),
                sub_bounds: cell.bounds,
            })
            .collect();

        sources.sort_by(|a, b| {
            (a.asset_url.as_str(), a.sub_id.as_str()).cmp(&(b.asset_url.as_str(), b.sub_id.as_str()))
        });
        sources.dedup_by(|a, b| a.asset_url == b.asset_url && a.sub_id == b.sub_id);
        sources
    }
}
