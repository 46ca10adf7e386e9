//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use gridfuse::config::ConfigFileError;
use gridfuse::footprint::FootprintError;
use gridfuse::partition::WriteError;
use gridfuse::pipeline::PipelineError;

/// Exit code for an exhausted round budget under `--strict`.
pub const EXIT_INCOMPLETE: i32 = 3;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read, parsed or written
    ConfigFile(ConfigFileError),
    /// Asset manifest could not be loaded
    Manifest(FootprintError),
    /// Partitioning failed
    Pipeline(PipelineError),
    /// Failed to write output
    Write(WriteError),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Pipeline(PipelineError::IterationBudgetExceeded { .. }) => EXIT_INCOMPLETE,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Pipeline(PipelineError::IterationBudgetExceeded { .. }) => {
                eprintln!();
                eprintln!("Overlaps remain after the round budget was spent. Either:");
                eprintln!("  1. Raise the budget with --max-rounds or [resolver] max_rounds");
                eprintln!("  2. Drop --strict to write the partial partition with a warning");
            }
            CliError::Pipeline(PipelineError::SnapRangeExceeded { .. }) => {
                eprintln!();
                eprintln!("Projected coordinates need fewer decimals. Lower [resolver] snap_decimals");
                eprintln!("(3 is enough for metre-based CRSs such as EPSG:3857).");
            }
            CliError::Pipeline(PipelineError::NoCells { .. }) => {
                eprintln!();
                eprintln!("Check that manifest entries have \"bounds\" and match [input] crs.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::Manifest(e) => write!(f, "{}", e),
            CliError::Pipeline(e) => write!(f, "Partitioning failed: {}", e),
            CliError::Write(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Manifest(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
            CliError::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<FootprintError> for CliError {
    fn from(e: FootprintError) -> Self {
        CliError::Manifest(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}

impl From<WriteError> for CliError {
    fn from(e: WriteError) -> Self {
        CliError::Write(e)
    }
}
