//! Sub-grid construction for a single raster footprint.

use tracing::{debug, trace};

use super::error::FootprintError;
use super::reader::BoundsReader;
use super::types::{Asset, AssetSpec, Bounds, GridShape, SubCell};

/// Builds the fixed `nx × ny` sub-grid of an asset footprint.
#[derive(Debug, Clone, Default)]
pub struct FootprintGridBuilder {
    /// When set, assets reporting a different CRS are rejected.
    expected_crs: Option<String>,
}

impl FootprintGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require every asset to be in `crs`.
    pub fn with_expected_crs(crs: impl Into<String>) -> Self {
        Self {
            expected_crs: Some(crs.into()),
        }
    }

    /// Read the bounds of an asset and validate them against the grid request.
    pub fn open(
        &self,
        spec: &AssetSpec,
        reader: &dyn BoundsReader,
    ) -> Result<Asset, FootprintError> {
        if spec.grid.nx == 0 || spec.grid.ny == 0 {
            return Err(FootprintError::InvalidGrid {
                url: spec.url.clone(),
                grid: spec.grid,
            });
        }

        let raster = reader.read_bounds(&spec.url)?;

        if let Some(expected) = &self.expected_crs {
            if !raster.crs.eq_ignore_ascii_case(expected) {
                return Err(FootprintError::CrsMismatch {
                    url: spec.url.clone(),
                    expected: expected.clone(),
                    found: raster.crs,
                });
            }
        }

        if !raster.bounds.is_valid() {
            return Err(FootprintError::InvalidBounds {
                url: spec.url.clone(),
                bounds: raster.bounds,
            });
        }

        Ok(Asset {
            url: spec.url.clone(),
            bounds: raster.bounds,
            crs: raster.crs,
            grid: spec.grid,
        })
    }

    /// Open an asset and cut its footprint into sub-cells.
    ///
    /// Either every sub-cell is returned or the asset fails as a whole.
    pub fn build(
        &self,
        spec: &AssetSpec,
        reader: &dyn BoundsReader,
    ) -> Result<Vec<SubCell>, FootprintError> {
        let asset = self.open(spec, reader)?;
        let cells = subdivide(&asset.url, &asset.bounds, asset.grid);
        debug!(
            url = %asset.url,
            bounds = %asset.bounds,
            grid = %asset.grid,
            cells = cells.len(),
            "Built footprint sub-grid"
        );
        Ok(cells)
    }
}

/// Cut `bounds` into `grid.nx × grid.ny` equal sub-boxes with ids `"{i}_{j}"`.
///
/// `i` indexes columns (x) and `j` rows (y). The outermost edges are pinned to
/// the footprint edges so the cells cover the box exactly.
pub fn subdivide(url: &str, bounds: &Bounds, grid: GridShape) -> Vec<SubCell> {
    let xs = edges(bounds.minx, bounds.maxx, grid.nx);
    let ys = edges(bounds.miny, bounds.maxy, grid.ny);

    let mut cells = Vec::with_capacity(grid.cell_count());
    for i in 0..grid.nx as usize {
        for j in 0..grid.ny as usize {
            let cell_bounds = Bounds::new(xs[i], ys[j], xs[i + 1], ys[j + 1]);
            trace!(url, i, j, bounds = %cell_bounds, "Sub-cell");
            cells.push(SubCell::new(url, format!("{}_{}", i, j), cell_bounds));
        }
    }
    cells
}

/// `n + 1` evenly spaced edges from `min` to `max`, last edge exactly `max`.
fn edges(min: f64, max: f64, n: u32) -> Vec<f64> {
    let step = (max - min) / n as f64;
    (0..=n)
        .map(|k| if k == n { max } else { min + step * k as f64 })
        .collect()
}
