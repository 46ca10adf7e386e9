//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use std::path::Path;

use clap::Subcommand;
use gridfuse::config::{config_file_path, ConfigFile};

use crate::error::CliError;
use crate::runner::load_config;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a commented default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
///
/// `config_path` overrides the default `~/.gridfuse/config.ini`.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(&path),
        ConfigCommands::Init { force } => run_init(&path, force),
    }
}

/// Print the effective configuration.
fn run_show(path: &Path) -> Result<(), CliError> {
    let config = load_config(Some(path))?;

    println!("Configuration Settings");
    println!("======================");
    if !path.exists() {
        println!("(no file at {}, showing defaults)", path.display());
    }
    println!();
    println!("[grid]");
    println!("  nx = {}", config.grid.nx);
    println!("  ny = {}", config.grid.ny);
    println!();
    println!("[resolver]");
    println!("  max_rounds = {}", config.resolver.max_rounds);
    println!("  snap_decimals = {}", config.resolver.snap_decimals);
    println!(
        "  fail_on_incomplete = {}",
        config.resolver.fail_on_incomplete
    );
    println!();
    println!("[input]");
    println!("  crs = {}", config.input.crs);
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());
    println!("  file = {}", config.logging.file);

    Ok(())
}

/// Create the config file with defaults.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use 'gridfuse config init --force' to overwrite it.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(path)?;
    println!("Created {}", path.display());
    Ok(())
}
