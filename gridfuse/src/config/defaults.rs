//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::settings::*;
use crate::overlay::{Precision, DEFAULT_SNAP_DECIMALS};
use crate::resolver::DEFAULT_MAX_ROUNDS;

// =============================================================================
// Grid defaults
// =============================================================================

/// Default cells along x.
pub const DEFAULT_GRID_NX: u32 = 4;

/// Default cells along y.
pub const DEFAULT_GRID_NY: u32 = 4;

// =============================================================================
// Resolver defaults
// =============================================================================

/// Largest accepted `snap_decimals`.
pub const MAX_SNAP_DECIMALS: u32 = Precision::MAX_DECIMALS;

// =============================================================================
// Input defaults
// =============================================================================

/// Default footprint CRS.
pub const DEFAULT_INPUT_CRS: &str = "EPSG:4326";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log directory name, relative to the config directory.
pub const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "gridfuse.log";

// =============================================================================
// ConfigFile defaults
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            grid: GridSettings {
                nx: DEFAULT_GRID_NX,
                ny: DEFAULT_GRID_NY,
            },
            resolver: ResolverSettings {
                max_rounds: DEFAULT_MAX_ROUNDS,
                snap_decimals: DEFAULT_SNAP_DECIMALS,
                fail_on_incomplete: false,
            },
            input: InputSettings {
                crs: DEFAULT_INPUT_CRS.to_string(),
            },
            logging: LoggingSettings {
                directory: config_dir.join(DEFAULT_LOG_DIR_NAME),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}
