//! [`GeometryOps`] backed by the `geo` crate.

use geo::{BooleanOps, BoundingRect, Polygon, Rect};

use super::error::GeometryError;
use super::key::{CanonicalKey, Precision};
use super::GeometryOps;

/// Default number of decimals outputs are snapped to.
pub const DEFAULT_SNAP_DECIMALS: u32 = 6;

/// Floating-point overlay using `geo` boolean operations.
///
/// Every output fragment is snapped to the configured decimal grid and
/// normalized through its [`CanonicalKey`], so fragments computed along
/// different paths compare equal and sub-grid slivers collapse into invalid
/// geometries.
#[derive(Debug, Clone, Copy)]
pub struct GeoOverlay {
    precision: Precision,
}

impl Default for GeoOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_DECIMALS)
    }
}

impl GeoOverlay {
    pub fn new(snap_decimals: u32) -> Self {
        Self {
            precision: Precision::new(snap_decimals),
        }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Normalize a fragment, or hand it back unchanged if it is invalid so the
    /// caller's validity check can reject it.
    fn snap_fragment(&self, polygon: Polygon<f64>) -> Polygon<f64> {
        match CanonicalKey::from_polygon(&polygon, self.precision) {
            Ok(key) => key.to_polygon(self.precision),
            Err(_) => polygon,
        }
    }
}

impl GeometryOps for GeoOverlay {
    fn overlaps(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> bool {
        let (Some(ra), Some(rb)) = (a.bounding_rect(), b.bounding_rect()) else {
            return false;
        };
        if !interiors_intersect(&ra, &rb) {
            return false;
        }
        match (self.canonical_key(a), self.canonical_key(b)) {
            (Ok(ka), Ok(kb)) if ka == kb => return false,
            (Err(_), _) | (_, Err(_)) => return false,
            _ => {}
        }
        self.intersection(a, b).iter().any(|p| self.is_valid(p))
    }

    fn intersection(&self, a: &Polygon<f64>, b: &Polygon<f64>) -> Vec<Polygon<f64>> {
        a.intersection(b)
            .into_iter()
            .map(|p| self.snap_fragment(p))
            .collect()
    }

    fn difference(&self, a: &Polygon<f64>, others: &[&Polygon<f64>]) -> Vec<Polygon<f64>> {
        let mut remaining = vec![a.clone()];
        for other in others {
            if remaining.is_empty() {
                break;
            }
            remaining = remaining
                .iter()
                .flat_map(|piece| piece.difference(*other))
                .collect();
        }
        remaining.into_iter().map(|p| self.snap_fragment(p)).collect()
    }

    fn validate(&self, polygon: &Polygon<f64>) -> Result<(), GeometryError> {
        CanonicalKey::from_polygon(polygon, self.precision).map(|_| ())
    }

    fn normalize(&self, polygon: &Polygon<f64>) -> Result<Polygon<f64>, GeometryError> {
        CanonicalKey::from_polygon(polygon, self.precision).map(|key| key.to_polygon(self.precision))
    }

    fn canonical_key(&self, polygon: &Polygon<f64>) -> Result<CanonicalKey, GeometryError> {
        CanonicalKey::from_polygon(polygon, self.precision)
    }
}

/// Whether the open interiors of two rectangles share area.
fn interiors_intersect(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.min().x < b.max().x && b.min().x < a.max().x && a.min().y < b.max().y && b.min().y < a.max().y
}
