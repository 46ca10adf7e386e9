//! End-to-end driver: assets → sub-cells → disjoint attributed regions.
//!
//! ```text
//! AssetSpec[] ──(rayon)──► FootprintGridBuilder ──► split_antimeridian
//!                                                        │
//!          Partition ◄── PartitionDeduplicator ◄── OverlapResolver
//! ```
//!
//! Assets that cannot be opened are reported in
//! [`PartitionReport::asset_errors`] and never stop the other assets.

use geo::Polygon;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::antimeridian::split_antimeridian;
use crate::config::ConfigFile;
use crate::footprint::{AssetSpec, BoundsReader, FootprintError, FootprintGridBuilder, SubCell};
use crate::overlay::{GeoOverlay, GeometryOps};
use crate::partition::{Partition, PartitionDeduplicator};
use crate::resolver::{OverlapResolver, RoundStats};

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No asset produced a single sub-cell.
    #[error("no sub-cells to partition ({failed} of {requested} assets failed to open)")]
    NoCells { requested: usize, failed: usize },

    /// Sub-cell coordinates are too large for the configured snap grid.
    #[error("{cells} sub-cells exceed the coordinate range of the snap grid")]
    SnapRangeExceeded { cells: usize },

    /// The resolver ran out of rounds and incomplete results were refused.
    #[error("overlaps still unresolved after {rounds} rounds ({unresolved} candidates left)")]
    IterationBudgetExceeded { rounds: usize, unresolved: usize },
}

/// Counters for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub assets_requested: usize,
    pub assets_opened: usize,
    /// Sub-cells produced by the grid builder.
    pub grid_cells: usize,
    /// Sub-cells after the antimeridian split.
    pub split_cells: usize,
    /// Sub-cells rejected as invalid before resolution.
    pub dropped_cells: usize,
    /// Candidates left when the round budget ran out.
    pub unresolved: usize,
    pub rounds: Vec<RoundStats>,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct PartitionReport {
    pub partition: Partition,
    /// Assets skipped because their footprint could not be opened.
    pub asset_errors: Vec<FootprintError>,
    pub stats: PipelineStats,
}

/// Runs grid building, antimeridian splitting, overlap resolution and
/// deduplication in sequence.
#[derive(Debug, Clone)]
pub struct PartitionPipeline<O = GeoOverlay> {
    builder: FootprintGridBuilder,
    resolver: OverlapResolver<O>,
    fail_on_incomplete: bool,
}

impl PartitionPipeline<GeoOverlay> {
    /// Pipeline configured from the `[resolver]` and `[input]` sections.
    pub fn from_config(config: &ConfigFile) -> Self {
        Self::new(GeoOverlay::new(config.resolver.snap_decimals))
            .with_expected_crs(config.input.crs.clone())
            .with_max_rounds(config.resolver.max_rounds)
            .with_fail_on_incomplete(config.resolver.fail_on_incomplete)
    }
}

impl<O: GeometryOps> PartitionPipeline<O> {
    pub fn new(ops: O) -> Self {
        Self {
            builder: FootprintGridBuilder::new(),
            resolver: OverlapResolver::new(ops),
            fail_on_incomplete: false,
        }
    }

    pub fn with_expected_crs(mut self, crs: impl Into<String>) -> Self {
        self.builder = FootprintGridBuilder::with_expected_crs(crs);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.resolver = self.resolver.with_max_rounds(max_rounds);
        self
    }

    /// Turn an exhausted round budget into [`PipelineError::IterationBudgetExceeded`].
    pub fn with_fail_on_incomplete(mut self, fail: bool) -> Self {
        self.fail_on_incomplete = fail;
        self
    }

    /// Build the sub-grids of all assets in parallel.
    ///
    /// Cells keep the order of `assets`; failures are collected per asset.
    pub fn build_cells(
        &self,
        assets: &[AssetSpec],
        reader: &dyn BoundsReader,
    ) -> (Vec<SubCell>, Vec<FootprintError>) {
        let builder = &self.builder;
        let results: Vec<Result<Vec<SubCell>, FootprintError>> = assets
            .par_iter()
            .map(|spec| builder.build(spec, reader))
            .collect();

        let mut cells = Vec::new();
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok(built) => cells.extend(built),
                Err(error) => {
                    warn!(%error, "Skipping asset");
                    errors.push(error);
                }
            }
        }
        (cells, errors)
    }

    /// Run the full pipeline over `assets`.
    pub fn run(
        &self,
        assets: &[AssetSpec],
        reader: &dyn BoundsReader,
    ) -> Result<PartitionReport, PipelineError> {
        let (cells, asset_errors) = self.build_cells(assets, reader);
        if cells.is_empty() {
            return Err(PipelineError::NoCells {
                requested: assets.len(),
                failed: asset_errors.len(),
            });
        }

        let (partition, mut stats) = self.partition_cells(&cells)?;
        stats.assets_requested = assets.len();
        stats.assets_opened = assets.len() - asset_errors.len();

        Ok(PartitionReport {
            partition,
            asset_errors,
            stats,
        })
    }

    /// Split, resolve and deduplicate already-built sub-cells.
    pub fn partition_cells(
        &self,
        cells: &[SubCell],
    ) -> Result<(Partition, PipelineStats), PipelineError> {
        let split = split_antimeridian(cells);
        let polygons: Vec<Polygon<f64>> = split.iter().map(SubCell::to_polygon).collect();

        let outcome = self.resolver.resolve(&polygons);
        if outcome.out_of_range > 0 {
            return Err(PipelineError::SnapRangeExceeded {
                cells: outcome.out_of_range,
            });
        }
        if !outcome.complete && self.fail_on_incomplete {
            return Err(PipelineError::IterationBudgetExceeded {
                rounds: outcome.rounds,
                unresolved: outcome.leftover.len(),
            });
        }

        let regions =
            PartitionDeduplicator::new(self.resolver.ops()).deduplicate(&outcome.regions, &split);
        let partition = Partition {
            regions,
            complete: outcome.complete,
            rounds: outcome.rounds,
        };

        info!(
            cells = cells.len(),
            split_cells = split.len(),
            regions = partition.len(),
            rounds = outcome.rounds,
            complete = outcome.complete,
            "Partition built"
        );

        let stats = PipelineStats {
            grid_cells: cells.len(),
            split_cells: split.len(),
            dropped_cells: outcome.dropped_inputs,
            unresolved: outcome.leftover.len(),
            rounds: outcome.round_stats,
            ..PipelineStats::default()
        };
        Ok((partition, stats))
    }
}
