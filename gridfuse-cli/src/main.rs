//! gridfuse CLI - Command-line interface
//!
//! This binary drives the gridfuse library: it reads an asset manifest,
//! builds the disjoint partition and writes it as GeoJSON.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridfuse::footprint::GridShape;

use commands::cells::CellsArgs;
use commands::common::parse_grid;
use commands::config::ConfigCommands;
use commands::partition::PartitionArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "gridfuse")]
#[command(version = gridfuse::VERSION)]
#[command(about = "Partition overlapping raster footprint sub-grids into disjoint regions", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.gridfuse/config.ini
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the disjoint partition and write it as GeoJSON
    Partition {
        /// JSON manifest listing the assets
        #[arg(long)]
        manifest: PathBuf,

        /// Output GeoJSON path
        #[arg(long)]
        output: PathBuf,

        /// Also write the region → source join table to this path
        #[arg(long)]
        join_table: Option<PathBuf>,

        /// Default sub-grid for assets without one, e.g. 4x4
        #[arg(long, value_parser = parse_grid)]
        grid: Option<GridShape>,

        /// Maximum resolver rounds
        #[arg(long)]
        max_rounds: Option<usize>,

        /// Fail (exit code 3) instead of writing an incomplete partition
        #[arg(long)]
        strict: bool,
    },

    /// Print the sub-cells of every asset as JSON lines
    Cells {
        /// JSON manifest listing the assets
        #[arg(long)]
        manifest: PathBuf,

        /// Default sub-grid for assets without one, e.g. 4x4
        #[arg(long, value_parser = parse_grid)]
        grid: Option<GridShape>,

        /// Split cells at the antimeridian first
        #[arg(long)]
        split: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Config { command } => commands::config::run(command, config_path),
        Commands::Partition {
            manifest,
            output,
            join_table,
            grid,
            max_rounds,
            strict,
        } => {
            let runner = CliRunner::new(config_path, cli.verbose)?;
            commands::partition::run(
                &runner,
                PartitionArgs {
                    manifest,
                    output,
                    join_table,
                    grid,
                    max_rounds,
                    strict,
                },
            )
        }
        Commands::Cells {
            manifest,
            grid,
            split,
        } => {
            let runner = CliRunner::new(config_path, cli.verbose)?;
            commands::cells::run(
                &runner,
                CellsArgs {
                    manifest,
                    grid,
                    split,
                },
            )
        }
    }
}
