//! Common types and utilities shared across CLI commands.

use std::path::Path;

use gridfuse::config::ConfigFile;
use gridfuse::footprint::{AssetManifest, AssetSpec, GridShape, InMemoryBoundsReader};

use crate::error::CliError;

/// Clap value parser for `NXxNY` grid shapes.
pub fn parse_grid(s: &str) -> Result<GridShape, String> {
    GridShape::parse(s).ok_or_else(|| format!("invalid grid '{}': expected NXxNY, e.g. 4x4", s))
}

/// Resolve the default grid from CLI args and config.
///
/// CLI takes precedence, then config.
pub fn resolve_grid(cli_grid: Option<GridShape>, config: &ConfigFile) -> GridShape {
    cli_grid.unwrap_or_else(|| config.grid.shape())
}

/// Load a manifest into asset requests and a bounds reader.
pub fn load_assets(
    manifest: &Path,
    default_grid: GridShape,
    config: &ConfigFile,
) -> Result<(Vec<AssetSpec>, InMemoryBoundsReader), CliError> {
    let manifest = AssetManifest::load_from(manifest)?;
    Ok(manifest.into_parts(default_grid, &config.input.crs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grid() {
        assert_eq!(parse_grid("4x2").unwrap(), GridShape::new(4, 2));
        assert_eq!(parse_grid("8X8").unwrap(), GridShape::new(8, 8));
        assert!(parse_grid("0x4").is_err());
        assert!(parse_grid("four").is_err());
    }

    #[test]
    fn test_cli_grid_overrides_config() {
        let config = ConfigFile::default();
        assert_eq!(resolve_grid(None, &config), config.grid.shape());
        assert_eq!(
            resolve_grid(Some(GridShape::new(2, 3)), &config),
            GridShape::new(2, 3)
        );
    }
}
