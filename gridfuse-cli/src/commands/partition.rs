//! Partition command - build the disjoint partition of a manifest's assets.

use std::path::PathBuf;

use gridfuse::footprint::GridShape;
use gridfuse::partition::{write_geojson, write_join_table};
use gridfuse::pipeline::PartitionPipeline;
use tracing::{info, warn};

use super::common::{load_assets, resolve_grid};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the partition command.
pub struct PartitionArgs {
    pub manifest: PathBuf,
    pub output: PathBuf,
    pub join_table: Option<PathBuf>,
    pub grid: Option<GridShape>,
    pub max_rounds: Option<usize>,
    pub strict: bool,
}

/// Run the partition command.
pub fn run(runner: &CliRunner, args: PartitionArgs) -> Result<(), CliError> {
    runner.log_startup("partition");
    let config = runner.config();

    let grid = resolve_grid(args.grid, config);
    let (assets, reader) = load_assets(&args.manifest, grid, config)?;
    info!(
        manifest = %args.manifest.display(),
        assets = assets.len(),
        grid = %grid,
        "Loaded manifest"
    );

    let mut pipeline = PartitionPipeline::from_config(config);
    if let Some(max_rounds) = args.max_rounds {
        pipeline = pipeline.with_max_rounds(max_rounds);
    }
    if args.strict {
        pipeline = pipeline.with_fail_on_incomplete(true);
    }

    let report = pipeline.run(&assets, &reader)?;
    for error in &report.asset_errors {
        warn!(%error, "Asset skipped");
    }

    write_geojson(&report.partition, &args.output)?;
    if let Some(path) = &args.join_table {
        write_join_table(&report.partition, path)?;
    }

    let partition = &report.partition;
    let shared = partition.regions.iter().filter(|r| r.is_shared()).count();
    println!(
        "Partitioned {} of {} assets into {} regions ({} shared) in {} rounds",
        report.stats.assets_opened,
        report.stats.assets_requested,
        partition.len(),
        shared,
        partition.rounds
    );
    if !report.asset_errors.is_empty() {
        println!("Skipped {} asset(s); see log for details", report.asset_errors.len());
    }
    if !partition.complete {
        println!(
            "Warning: {} candidates unresolved after {} rounds; partition is incomplete",
            report.stats.unresolved, partition.rounds
        );
    }
    println!("Wrote {}", args.output.display());

    Ok(())
}
