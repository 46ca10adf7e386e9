//! User configuration stored in `~/.gridfuse/config.ini`.
//!
//! ```ini
//! [grid]
//! nx = 4
//! ny = 4
//!
//! [resolver]
//! max_rounds = 10
//! snap_decimals = 6
//! fail_on_incomplete = false
//!
//! [input]
//! crs = EPSG:4326
//!
//! [logging]
//! directory = logs
//! file = gridfuse.log
//! ```
//!
//! A missing file yields [`ConfigFile::default`]; an invalid value yields
//! [`ConfigFileError::InvalidValue`] naming the section and key.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, GridSettings, InputSettings, LoggingSettings, ResolverSettings};
