//! Antimeridian handling for sub-cells.
//!
//! Planar overlay operations cannot reason about the ±180° discontinuity, so
//! every sub-cell is first placed in a single longitude frame:
//!
//! ```text
//!   native frame          wrapped frame
//! -180 ........ 180 | 180 ........ 360
//!      not-past      |      past
//!            [ must-break ]  -> split at x = 180
//! ```
//!
//! After [`split_antimeridian`] no cell straddles x = 180 and every `sub_id`
//! carries a `_0` (native) or `_1` (wrapped) suffix, keeping ids unique when a
//! cell was split in two.

use tracing::debug;

use crate::footprint::{Bounds, SubCell, ANTIMERIDIAN};

/// Where a cell's longitude extent sits relative to the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeClass {
    /// Entirely west of (or ending on) the antimeridian.
    NotPast,
    /// Entirely in the wrapped frame, starting on or past the antimeridian.
    Past,
    /// Crosses the antimeridian and must be split.
    MustBreak,
}

impl LongitudeClass {
    /// Classify a box by its x extent.
    pub fn of(bounds: &Bounds) -> Self {
        if bounds.minx >= ANTIMERIDIAN {
            Self::Past
        } else if bounds.maxx > ANTIMERIDIAN {
            Self::MustBreak
        } else {
            Self::NotPast
        }
    }
}

/// Split cells crossing the antimeridian and tag every cell with its frame.
///
/// Returns a new collection; the input is left untouched.
pub fn split_antimeridian(cells: &[SubCell]) -> Vec<SubCell> {
    let mut out = Vec::with_capacity(cells.len());
    let mut broken = 0usize;

    for cell in cells {
        match LongitudeClass::of(&cell.bounds) {
            LongitudeClass::NotPast => out.push(tagged(cell, cell.bounds, false)),
            LongitudeClass::Past => out.push(tagged(cell, cell.bounds, true)),
            LongitudeClass::MustBreak => {
                let b = cell.bounds;
                out.push(tagged(
                    cell,
                    Bounds::new(b.minx, b.miny, ANTIMERIDIAN, b.maxy),
                    false,
                ));
                out.push(tagged(
                    cell,
                    Bounds::new(ANTIMERIDIAN, b.miny, b.maxx, b.maxy),
                    true,
                ));
                broken += 1;
            }
        }
    }

    debug!(
        input = cells.len(),
        output = out.len(),
        split = broken,
        "Split sub-cells at the antimeridian"
    );
    out
}

fn tagged(cell: &SubCell, bounds: Bounds, wrapped: bool) -> SubCell {
    SubCell {
        asset_url: cell.asset_url.clone(),
        sub_id: format!("{}_{}", cell.sub_id, u8::from(wrapped)),
        bounds,
        wrapped,
    }
}
