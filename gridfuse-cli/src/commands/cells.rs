//! Cells command - print the sub-cells a manifest produces.

use std::path::PathBuf;

use gridfuse::antimeridian::split_antimeridian;
use gridfuse::footprint::GridShape;
use gridfuse::pipeline::PartitionPipeline;
use serde_json::json;
use tracing::warn;

use super::common::{load_assets, resolve_grid};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the cells command.
pub struct CellsArgs {
    pub manifest: PathBuf,
    pub grid: Option<GridShape>,
    /// Apply the antimeridian split before printing
    pub split: bool,
}

/// Print one JSON object per sub-cell.
pub fn run(runner: &CliRunner, args: CellsArgs) -> Result<(), CliError> {
    runner.log_startup("cells");
    let config = runner.config();

    let grid = resolve_grid(args.grid, config);
    let (assets, reader) = load_assets(&args.manifest, grid, config)?;

    let (cells, errors) = PartitionPipeline::from_config(config).build_cells(&assets, &reader);
    for error in &errors {
        warn!(%error, "Asset skipped");
    }
    let cells = if args.split {
        split_antimeridian(&cells)
    } else {
        cells
    };

    for cell in &cells {
        let line = json!({
            "url": cell.asset_url,
            "sub_id": cell.sub_id,
            "bounds": cell.bounds,
            "wrapped": cell.wrapped,
        });
        println!("{}", line);
    }

    Ok(())
}
