//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::footprint::GridShape;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Default sub-grid for assets without their own
    pub grid: GridSettings,
    /// Overlap resolver settings
    pub resolver: ResolverSettings,
    /// Input expectations
    pub input: InputSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Default sub-grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSettings {
    /// Cells along x
    pub nx: u32,
    /// Cells along y
    pub ny: u32,
}

impl GridSettings {
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.nx, self.ny)
    }
}

/// Overlap resolver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Maximum refinement rounds before giving up
    pub max_rounds: usize,
    /// Decimal places geometry is snapped to
    pub snap_decimals: u32,
    /// Treat an exhausted round budget as an error instead of a warning
    pub fail_on_incomplete: bool,
}

/// Input configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSettings {
    /// CRS every asset must be in, compared case-insensitively
    pub crs: String,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log directory
    pub directory: PathBuf,
    /// Log file name inside `directory`
    pub file: String,
}
