//! Core footprint types: bounding boxes, grid shapes and sub-cells.

use std::fmt;

use geo::{coord, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// The antimeridian expressed in the native longitude frame.
pub const ANTIMERIDIAN: f64 = 180.0;

/// Axis-aligned bounding box in the footprint CRS.
///
/// # Examples
///
/// ```
/// use gridfuse::footprint::Bounds;
///
/// let bounds = Bounds::new(0.0, 0.0, 2.0, 1.0);
/// assert_eq!(bounds.width(), 2.0);
/// assert_eq!(bounds.area(), 2.0);
/// assert_eq!(format!("{}", bounds), "[0, 0, 2, 1]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Bounds {
    /// Create bounds from `(minx, miny, maxx, maxy)`.
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Whether all edges are finite and the box has positive extent.
    pub fn is_valid(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
            && self.minx < self.maxx
            && self.miny < self.maxy
    }

    /// Strict containment: points on the boundary are outside.
    pub fn contains_strict(&self, x: f64, y: f64) -> bool {
        self.minx < x && x < self.maxx && self.miny < y && y < self.maxy
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.minx, self.miny, self.maxx, self.maxy]
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.minx, y: self.miny },
            coord! { x: self.maxx, y: self.maxy },
        )
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        b.as_array()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.minx, self.miny, self.maxx, self.maxy
        )
    }
}

/// Number of sub-cells along x (`nx`) and y (`ny`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct GridShape {
    pub nx: u32,
    pub ny: u32,
}

impl GridShape {
    pub fn new(nx: u32, ny: u32) -> Self {
        Self { nx, ny }
    }

    /// Total number of sub-cells.
    pub fn cell_count(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    /// Parse a grid in `NXxNY` form, e.g. `4x4`.
    pub fn parse(s: &str) -> Option<Self> {
        let (nx, ny) = s.trim().to_lowercase().split_once('x').map(|(a, b)| {
            (a.trim().parse::<u32>(), b.trim().parse::<u32>())
        })?;
        match (nx, ny) {
            (Ok(nx), Ok(ny)) if nx > 0 && ny > 0 => Some(Self { nx, ny }),
            _ => None,
        }
    }
}

impl From<[u32; 2]> for GridShape {
    fn from(v: [u32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<GridShape> for [u32; 2] {
    fn from(g: GridShape) -> Self {
        [g.nx, g.ny]
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.nx, self.ny)
    }
}

/// A raster asset requested by the caller: where it lives and how to grid it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSpec {
    pub url: String,
    pub grid: GridShape,
}

impl AssetSpec {
    pub fn new(url: impl Into<String>, grid: GridShape) -> Self {
        Self {
            url: url.into(),
            grid,
        }
    }
}

/// An asset whose bounding box has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub url: String,
    pub bounds: Bounds,
    pub crs: String,
    pub grid: GridShape,
}

/// One rectangular subdivision of an asset footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct SubCell {
    /// URL of the asset this cell was cut from.
    pub asset_url: String,
    /// `"{i}_{j}"` from the grid builder, suffixed with `_{0|1}` once the
    /// antimeridian splitter has run.
    pub sub_id: String,
    pub bounds: Bounds,
    /// Whether the cell lies in the wrapped 180..360 longitude frame.
    pub wrapped: bool,
}

impl SubCell {
    pub fn new(asset_url: impl Into<String>, sub_id: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            asset_url: asset_url.into(),
            sub_id: sub_id.into(),
            bounds,
            wrapped: false,
        }
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }
}
