//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so command
//! handlers only deal with their own work.

use std::path::Path;

use gridfuse::config::ConfigFile;
use gridfuse::logging::{default_log_level, init_logging, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path` or `~/.gridfuse/config.ini`) and
    /// initialize logging.
    ///
    /// `verbose` lowers the default level to debug; `RUST_LOG` still wins.
    pub fn new(config_path: Option<&Path>, verbose: bool) -> Result<Self, CliError> {
        let config = load_config(config_path)?;

        let level = if verbose { "debug" } else { default_log_level() };
        let logging_guard = init_logging(&config.logging.directory, &config.logging.file, level)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("gridfuse v{}", gridfuse::VERSION);
        info!(
            log = %self.logging_guard.path().display(),
            "gridfuse CLI: {} command", command
        );
    }
}

/// Load the config file at `path`, or the default one.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}
