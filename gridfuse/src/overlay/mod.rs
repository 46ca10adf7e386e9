//! Geometry set operations used by the overlap resolver.
//!
//! The resolver only talks to [`GeometryOps`], so the floating-point
//! [`GeoOverlay`] can be replaced by a robust or exact-arithmetic backend
//! without touching the algorithm.

mod error;
mod geo_overlay;
mod key;

pub use error::GeometryError;
pub use geo_overlay::{GeoOverlay, DEFAULT_SNAP_DECIMALS};
pub use key::{CanonicalKey, Precision};

use geo::{Centroid, InteriorPoint, Point, Polygon};

/// Polygon set operations and identity.
pub trait GeometryOps {
    /// Strict overlap: the interiors share positive area. Boundary contact and
    /// exact equality do not count; containment does.
    fn overlaps(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool;

    /// `a ∩ b`, exploded into single polygons.
    fn intersection(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> Vec<Polygon<f64>>;

    /// `a` minus the union of `others`, exploded into single polygons.
    fn difference(&self, a: &Polygon<f64>, others: &[&Polygon<f64>]) -> Vec<Polygon<f64>>;

    fn validate(&self, polygon: &Polygon<f64>) -> Result<(), GeometryError>;

    /// Rewrite `polygon` in the backend's normal form so inputs and computed
    /// fragments share one coordinate grid.
    fn normalize(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, GeometryError>;

    fn is_valid(&self, polygon: &Polygon<f64>) -> bool {
        self.validate(polygon).is_ok()
    }

    /// Identity used to deduplicate geometrically equal polygons.
    fn canonical_key(&self, polygon: &Polygon<f64>) -> Result<CanonicalKey, GeometryError>;

    /// A point strictly inside the polygon, used to look up which inputs cover it.
    fn representative_point(&self, polygon: &Polygon<f64>) -> Option<Point<f64>> {
        polygon.interior_point().or_else(|| polygon.centroid())
    }
}
