//! Canonical geometry keys.
//!
//! A polygon is snapped to a decimal grid and reduced to a normal form:
//!
//! - repeated and collinear vertices removed,
//! - exterior ring counter-clockwise, holes clockwise,
//! - every ring rotated to start at its smallest vertex,
//! - holes sorted.
//!
//! Two polygons covering the same point set (up to the snap grid) produce
//! equal keys regardless of vertex order, starting vertex or redundant
//! vertices on their edges.

use geo::{Coord, LineString, Polygon};

use super::error::GeometryError;

/// Snap grid expressed as a number of decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    decimals: u32,
    scale: f64,
}

impl Precision {
    /// Largest supported number of decimals; beyond this snapped values lose
    /// integer exactness for typical coordinate ranges.
    pub const MAX_DECIMALS: u32 = 12;

    pub fn new(decimals: u32) -> Self {
        let decimals = decimals.min(Self::MAX_DECIMALS);
        Self {
            decimals,
            scale: 10f64.powi(decimals as i32),
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Largest absolute coordinate this grid can represent exactly.
    pub fn max_magnitude(&self) -> f64 {
        SNAP_LIMIT / self.scale
    }

    /// Snap a value to the grid, returning its integer grid index.
    pub fn snap(&self, v: f64) -> Result<i64, GeometryError> {
        if !v.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        let scaled = (v * self.scale).round();
        if scaled.abs() > SNAP_LIMIT {
            return Err(GeometryError::OutOfRange {
                decimals: self.decimals,
            });
        }
        Ok(scaled as i64)
    }

    /// Coordinate value of a grid index.
    pub fn unsnap(&self, k: i64) -> f64 {
        k as f64 / self.scale
    }
}

/// Grid indices stay inside the range where `i64 -> f64` is exact.
const SNAP_LIMIT: f64 = (1i64 << 52) as f64;

type Ring = Vec<(i64, i64)>;

/// Normalized, snapped ring representation of a polygon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey {
    /// Exterior ring first, then holes. Rings are open (no closing vertex).
    rings: Vec<Ring>,
}

impl CanonicalKey {
    /// Compute the key of a polygon, failing if it collapses on the snap grid.
    pub fn from_polygon(polygon: &Polygon<f64>, precision: Precision) -> Result<Self, GeometryError> {
        let exterior = snap_ring(polygon.exterior(), precision)?;
        let exterior = simplify_ring(exterior);
        if exterior.len() < 3 {
            return Err(GeometryError::Degenerate {
                vertices: exterior.len(),
            });
        }
        if twice_signed_area(&exterior) == 0 {
            return Err(GeometryError::ZeroArea);
        }
        let exterior = rotate_to_min(orient(exterior, true));

        let mut holes = Vec::with_capacity(polygon.interiors().len());
        for interior in polygon.interiors() {
            let ring = simplify_ring(snap_ring(interior, precision)?);
            // Collapsed holes carry no area; the polygon is still valid without them.
            if ring.len() < 3 || twice_signed_area(&ring) == 0 {
                continue;
            }
            holes.push(rotate_to_min(orient(ring, false)));
        }
        holes.sort();

        let mut rings = Vec::with_capacity(1 + holes.len());
        rings.push(exterior);
        rings.extend(holes);
        Ok(Self { rings })
    }

    /// Rebuild the normalized polygon.
    pub fn to_polygon(&self, precision: Precision) -> Polygon<f64> {
        let mut rings = self.rings.iter().map(|ring| {
            let mut coords: Vec<Coord<f64>> = ring
                .iter()
                .map(|&(x, y)| Coord {
                    x: precision.unsnap(x),
                    y: precision.unsnap(y),
                })
                .collect();
            if let Some(first) = coords.first().copied() {
                coords.push(first);
            }
            LineString::new(coords)
        });
        let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
        Polygon::new(exterior, rings.collect())
    }

    /// Twice the area of the key on the integer grid.
    pub fn twice_area(&self) -> i128 {
        let mut rings = self.rings.iter();
        let exterior = rings.next().map(|r| twice_signed_area(r)).unwrap_or(0);
        exterior + rings.map(|r| twice_signed_area(r)).sum::<i128>()
    }

    /// Smallest vertex of the exterior ring.
    pub fn anchor(&self) -> Option<(i64, i64)> {
        self.rings.first().and_then(|r| r.first().copied())
    }

    pub fn hole_count(&self) -> usize {
        self.rings.len().saturating_sub(1)
    }
}

fn snap_ring(ring: &LineString<f64>, precision: Precision) -> Result<Ring, GeometryError> {
    let mut out: Ring = ring
        .coords()
        .map(|c| -> Result<(i64, i64), GeometryError> {
            Ok((precision.snap(c.x)?, precision.snap(c.y)?))
        })
        .collect::<Result<_, _>>()?;
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    Ok(out)
}

/// Drop repeated vertices and vertices lying on the segment between their
/// neighbours (including spikes), treating the ring as cyclic.
fn simplify_ring(mut ring: Ring) -> Ring {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    loop {
        let n = ring.len();
        if n < 3 {
            return ring;
        }
        let redundant = (0..n).find(|&i| {
            let prev = ring[(i + n - 1) % n];
            let next = ring[(i + 1) % n];
            cross(prev, ring[i], next) == 0
        });
        match redundant {
            Some(i) => {
                ring.remove(i);
                ring.dedup();
                while ring.len() > 1 && ring.first() == ring.last() {
                    ring.pop();
                }
            }
            None => return ring,
        }
    }
}

fn cross(a: (i64, i64), b: (i64, i64), c: (i64, i64)) -> i128 {
    let (abx, aby) = ((b.0 - a.0) as i128, (b.1 - a.1) as i128);
    let (acx, acy) = ((c.0 - a.0) as i128, (c.1 - a.1) as i128);
    abx * acy - aby * acx
}

/// Shoelace sum; positive for counter-clockwise rings.
fn twice_signed_area(ring: &[(i64, i64)]) -> i128 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            x0 as i128 * y1 as i128 - x1 as i128 * y0 as i128
        })
        .sum()
}

fn orient(mut ring: Ring, ccw: bool) -> Ring {
    if (twice_signed_area(&ring) > 0) != ccw {
        ring.reverse();
    }
    ring
}

fn rotate_to_min(mut ring: Ring) -> Ring {
    if let Some((idx, _)) = ring.iter().enumerate().min_by_key(|(_, p)| **p) {
        ring.rotate_left(idx);
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area};

    fn p6() -> Precision {
        Precision::new(6)
    }

    #[test]
    fn test_snap_is_exact_for_decimals() {
        let p = p6();
        assert_eq!(p.snap(2.0), Ok(2_000_000));
        assert_eq!(p.unsnap(2_000_000), 2.0);
        assert_eq!(p.unsnap(p.snap(0.1).unwrap()), 0.1);
        assert_eq!(p.snap(f64::NAN), Err(GeometryError::NonFinite));
        assert_eq!(p.snap(f64::INFINITY), Err(GeometryError::NonFinite));
    }

    #[test]
    fn test_snap_rejects_magnitudes_beyond_the_grid() {
        // Web Mercator eastings reach ~2e7; nine decimals cannot hold them.
        let p = Precision::new(9);
        assert!(p.max_magnitude() < 1e7);
        assert_eq!(p.snap(1.0e7), Err(GeometryError::OutOfRange { decimals: 9 }));
        assert!(p6().snap(1.0e7).is_ok());
        assert!(p6().max_magnitude() > 2.0e7);
    }

    #[test]
    fn test_key_out_of_range_is_not_non_finite() {
        let cell = polygon![
            (x: 1.0e7, y: 5.0e6),
            (x: 1.0e7 + 1000.0, y: 5.0e6),
            (x: 1.0e7 + 1000.0, y: 5.0e6 + 1000.0),
            (x: 1.0e7, y: 5.0e6 + 1000.0),
        ];
        assert_eq!(
            CanonicalKey::from_polygon(&cell, Precision::new(9)),
            Err(GeometryError::OutOfRange { decimals: 9 })
        );
        assert!(CanonicalKey::from_polygon(&cell, p6()).is_ok());
    }

    #[test]
    fn test_precision_clamped() {
        assert_eq!(Precision::new(40).decimals(), Precision::MAX_DECIMALS);
    }

    #[test]
    fn test_key_ignores_start_vertex_and_direction() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let b = polygon![(x: 2.0, y: 2.0), (x: 2.0, y: 0.0), (x: 0.0, y: 0.0), (x: 0.0, y: 2.0)];
        let ka = CanonicalKey::from_polygon(&a, p6()).unwrap();
        let kb = CanonicalKey::from_polygon(&b, p6()).unwrap();
        assert_eq!(ka, kb);
        assert_eq!(ka.anchor(), Some((0, 0)));
    }

    #[test]
    fn test_key_drops_collinear_and_repeated_vertices() {
        let plain = polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)];
        let noisy = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 1.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
            (x: 0.0, y: 1.0),
        ];
        assert_eq!(
            CanonicalKey::from_polygon(&plain, p6()).unwrap(),
            CanonicalKey::from_polygon(&noisy, p6()).unwrap()
        );
    }

    #[test]
    fn test_key_absorbs_noise_below_grid() {
        let a = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        let b = polygon![
            (x: 0.0, y: 1e-9),
            (x: 1.0 + 1e-9, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0 - 1e-9)
        ];
        assert_eq!(
            CanonicalKey::from_polygon(&a, p6()).unwrap(),
            CanonicalKey::from_polygon(&b, p6()).unwrap()
        );
    }

    #[test]
    fn test_degenerate_polygons_rejected() {
        let line = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 2.0, y: 0.0)];
        assert!(CanonicalKey::from_polygon(&line, p6()).is_err());

        let sliver = polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1e-9), (x: 0.0, y: 1e-9)];
        assert!(CanonicalKey::from_polygon(&sliver, p6()).is_err());

        let nan = polygon![(x: 0.0, y: 0.0), (x: f64::NAN, y: 0.0), (x: 1.0, y: 1.0)];
        assert!(matches!(
            CanonicalKey::from_polygon(&nan, p6()),
            Err(GeometryError::NonFinite)
        ));
    }

    #[test]
    fn test_round_trip_preserves_shape() {
        let l_shape = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 2.0),
            (x: 0.0, y: 2.0)
        ];
        let key = CanonicalKey::from_polygon(&l_shape, p6()).unwrap();
        let rebuilt = key.to_polygon(p6());
        assert_eq!(rebuilt.unsigned_area(), 3.0);
        assert_eq!(rebuilt.exterior().0.len(), 7);
        assert_eq!(key.twice_area(), 2 * 3_000_000_000_000);
    }

    #[test]
    fn test_holes_are_kept_and_oriented() {
        let frame = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0), (0.0, 0.0)]),
            vec![LineString::from(vec![
                (1.0, 1.0),
                (2.0, 1.0),
                (2.0, 2.0),
                (1.0, 2.0),
                (1.0, 1.0),
            ])],
        );
        let key = CanonicalKey::from_polygon(&frame, p6()).unwrap();
        assert_eq!(key.hole_count(), 1);
        let rebuilt = key.to_polygon(p6());
        assert_eq!(rebuilt.unsigned_area(), 8.0);
    }
}
