//! Geometry validity errors.

use thiserror::Error;

/// Why a computed geometry was rejected.
///
/// Fragment errors are recovered locally: the offending fragment is dropped
/// and no region is produced for it. [`GeometryError::OutOfRange`] on an input
/// means area would be lost and is surfaced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Invalid geometry: non-finite coordinate")]
    NonFinite,

    /// A coordinate is too large for the snap grid to represent exactly.
    #[error("Coordinate magnitude exceeds the range of a {decimals}-decimal snap grid")]
    OutOfRange { decimals: u32 },

    #[error("Invalid geometry: ring collapsed to {vertices} distinct vertices")]
    Degenerate { vertices: usize },

    #[error("Invalid geometry: zero area")]
    ZeroArea,
}

impl GeometryError {
    /// Whether the geometry is fine but the snap grid cannot hold it.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, GeometryError::OutOfRange { .. })
    }
}
