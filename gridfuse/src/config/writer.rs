//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let fail_on_incomplete = if config.resolver.fail_on_incomplete {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[grid]
; Default sub-grid for assets whose manifest entry has no "grid"
; Each footprint is cut into nx columns by ny rows of sub-cells
nx = {}
ny = {}

[resolver]
; Maximum refinement rounds (default: 10)
; Overlaps still unresolved after the last round are left out of the partition
max_rounds = {}
; Decimal places geometry is snapped to before comparison (default: 6, max: 12)
snap_decimals = {}
; Fail instead of warning when the round budget runs out (default: false)
fail_on_incomplete = {}

[input]
; CRS every asset footprint must be in; assets in another CRS are skipped
crs = {}

[logging]
; Log directory; relative paths are resolved against ~/.gridfuse
directory = {}
; Log file name
file = {}
"#,
        config.grid.nx,
        config.grid.ny,
        config.resolver.max_rounds,
        config.resolver.snap_decimals,
        fail_on_incomplete,
        config.input.crs,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert path to string, using ~ for home directory.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use super::to_config_string;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.grid.nx = 6;
        config.grid.ny = 3;
        config.resolver.max_rounds = 20;
        config.resolver.snap_decimals = 8;
        config.resolver.fail_on_incomplete = true;
        config.input.crs = "EPSG:32633".to_string();
        config.logging.directory = PathBuf::from("/tmp/gridfuse-logs");

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        ConfigFile::default().save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn test_output_is_commented() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("[resolver]"));
        assert!(text.contains("max_rounds = 10"));
        assert!(text.lines().any(|l| l.starts_with(';')));
    }
}
