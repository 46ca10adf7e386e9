//! A single refinement round of the overlap resolver.

use std::collections::HashSet;

use geo::{BoundingRect, Polygon};
use rstar::{RTree, RTreeObject, AABB};
use tracing::trace;

use crate::overlay::GeometryOps;

/// Counters describing one round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundStats {
    /// 1-based round number.
    pub round: usize,
    /// Candidates entering the round.
    pub candidates: usize,
    /// Candidates with no overlap partner, final from this round on.
    pub stable: usize,
    /// Candidates with at least one overlap partner.
    pub active: usize,
    /// Overlapping candidate pairs.
    pub pairs: usize,
    /// Differences and intersections computed before validation.
    pub produced: usize,
    /// Fragments dropped as invalid.
    pub dropped_invalid: usize,
    /// Unique candidates handed to the next round.
    pub next: usize,
}

/// Outcome of one round.
pub(super) struct RoundOutput {
    pub stable: Vec<Polygon<f64>>,
    pub next: Vec<Polygon<f64>>,
    pub stats: RoundStats,
}

/// Envelope of a candidate, keyed by its in-round id.
#[derive(Clone)]
struct CandidateBox {
    gid: usize,
    env: AABB<[f64; 2]>,
}

impl RTreeObject for CandidateBox {
    type Envelope = AABB<[f64; 2]>;

    #[inline]
    fn envelope(&self) -> Self::Envelope {
        self.env
    }
}

fn envelope_of(polygon: &Polygon<f64>) -> Option<AABB<[f64; 2]>> {
    polygon.bounding_rect().map(|r| {
        AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y])
    })
}

/// Refine `candidates` once: separate stable candidates from overlapping ones
/// and replace the overlapping ones by their exclusive parts and pairwise
/// intersections.
pub(super) fn run_round<O: GeometryOps>(
    ops: &O,
    round: usize,
    candidates: Vec<Polygon<f64>>,
) -> RoundOutput {
    let n = candidates.len();

    // Candidate ids are positions in `candidates`, fresh every round.
    let envelopes: Vec<Option<AABB<[f64; 2]>>> = candidates.iter().map(envelope_of).collect();
    let tree = RTree::bulk_load(
        envelopes
            .iter()
            .enumerate()
            .filter_map(|(gid, env)| env.map(|env| CandidateBox { gid, env }))
            .collect(),
    );

    let mut partners: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for (gid, env) in envelopes.iter().enumerate() {
        let Some(env) = env else { continue };
        for other in tree.locate_in_envelope_intersecting(env) {
            if other.gid <= gid {
                continue;
            }
            if ops.overlaps(&candidates[gid], &candidates[other.gid]) {
                partners[gid].push(other.gid);
                partners[other.gid].push(gid);
                pairs.push((gid, other.gid));
            }
        }
    }

    let mut stable = Vec::new();
    let mut produced = Vec::new();
    for (gid, candidate) in candidates.iter().enumerate() {
        if partners[gid].is_empty() {
            stable.push(candidate.clone());
            continue;
        }
        let others: Vec<&Polygon<f64>> = partners[gid].iter().map(|&j| &candidates[j]).collect();
        produced.extend(ops.difference(candidate, &others));
    }
    for &(a, b) in &pairs {
        produced.extend(ops.intersection(&candidates[a], &candidates[b]));
    }

    let produced_count = produced.len();
    let (next, dropped_invalid) = dedupe_valid(ops, produced);

    let stats = RoundStats {
        round,
        candidates: n,
        stable: stable.len(),
        active: n - stable.len(),
        pairs: pairs.len(),
        produced: produced_count,
        dropped_invalid,
        next: next.len(),
    };
    RoundOutput {
        stable,
        next,
        stats,
    }
}

/// Drop invalid polygons and collapse geometrically equal ones.
///
/// Returns the unique valid polygons (first occurrence wins) and the number
/// of polygons dropped as invalid.
pub(crate) fn dedupe_valid<O, I>(ops: &O, polygons: I) -> (Vec<Polygon<f64>>, usize)
where
    O: GeometryOps,
    I: IntoIterator<Item = Polygon<f64>>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    let mut dropped = 0usize;

    for polygon in polygons {
        let key = ops
            .validate(&polygon)
            .and_then(|_| ops.canonical_key(&polygon));
        match key {
            Ok(key) => {
                if seen.insert(key) {
                    unique.push(polygon);
                }
            }
            Err(error) => {
                trace!(%error, "Dropping invalid fragment");
                dropped += 1;
            }
        }
    }
    (unique, dropped)
}
