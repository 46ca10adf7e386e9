//! Overlap resolution: reduce overlapping polygons to interior-disjoint regions.
//!
//! # Algorithm
//!
//! Each round takes the current candidates and:
//!
//! 1. numbers them,
//! 2. finds every pair whose interiors overlap (R-tree prefilter, then the
//!    strict overlap predicate),
//! 3. sets aside candidates without a partner as **stable** (final),
//! 4. replaces every overlapping candidate by its part not covered by any
//!    partner, and every pair by its intersection,
//! 5. drops invalid fragments and collapses equal ones by canonical key.
//!
//! A fragment cut against one partner can still overlap a third candidate,
//! so rounds repeat until no candidate is left or the round budget runs out.
//! The run is a fold over rounds whose result says whether the fixed point
//! was reached:
//!
//! ```text
//! fold(candidates, round, max_rounds) -> (stable regions, leftover candidates)
//! ```
//!
//! Inputs are first normalized onto the same snap grid as every computed
//! fragment, so stable inputs and fragments share edges exactly.
//!
//! When the budget is exhausted the leftover area is **not** part of
//! `regions`; check [`ResolveOutcome::complete`]. The same holds for inputs
//! whose coordinates the snap grid cannot represent
//! ([`ResolveOutcome::out_of_range`]).

mod round;


use std::ops::ControlFlow;

use geo::Polygon;
use tracing::{debug, info, warn};

use crate::overlay::GeometryOps;

pub use round::RoundStats;
pub(crate) use round::dedupe_valid;

/// Default round budget.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Result of a resolver run.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// Pairwise interior-disjoint regions.
    pub regions: Vec<Polygon<f64>>,
    /// Candidates still unresolved when the round budget ran out.
    pub leftover: Vec<Polygon<f64>>,
    /// Rounds executed.
    pub rounds: usize,
    /// `true` when the fixed point was reached (`leftover` is empty) and no
    /// input was lost to the snap grid's range.
    pub complete: bool,
    /// Input polygons dropped before the first round, including `out_of_range`.
    pub dropped_inputs: usize,
    /// Inputs dropped because their coordinates exceed the snap grid's range.
    pub out_of_range: usize,
    pub round_stats: Vec<RoundStats>,
}

/// Fold state threaded through the rounds.
struct FoldState {
    stable: Vec<Polygon<f64>>,
    working: Vec<Polygon<f64>>,
    stats: Vec<RoundStats>,
}

/// Iterative overlap resolver.
#[derive(Debug, Clone)]
pub struct OverlapResolver<O> {
    ops: O,
    max_rounds: usize,
}

impl<O: GeometryOps> OverlapResolver<O> {
    pub fn new(ops: O) -> Self {
        Self {
            ops,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Resolve `inputs` into interior-disjoint regions covering the same area.
    pub fn resolve(&self, inputs: &[Polygon<f64>]) -> ResolveOutcome {
        let (working, dropped_inputs, out_of_range) = self.prepare_inputs(inputs);
        debug!(
            inputs = inputs.len(),
            unique = working.len(),
            dropped = dropped_inputs,
            max_rounds = self.max_rounds,
            "Resolving overlaps"
        );

        let initial = FoldState {
            stable: Vec::new(),
            working,
            stats: Vec::new(),
        };
        let folded = (1..=self.max_rounds).try_fold(initial, |state, round| {
            if state.working.is_empty() {
                ControlFlow::Break(state)
            } else {
                ControlFlow::Continue(self.step(state, round))
            }
        });
        let state = match folded {
            ControlFlow::Break(state) | ControlFlow::Continue(state) => state,
        };

        let (regions, _) = dedupe_valid(&self.ops, state.stable);
        let complete = state.working.is_empty() && out_of_range == 0;
        let rounds = state.stats.len();

        if complete {
            info!(regions = regions.len(), rounds, "Overlap resolution converged");
        } else if out_of_range > 0 {
            warn!(
                regions = regions.len(),
                out_of_range,
                "Inputs exceed the snap grid's coordinate range; partition is incomplete"
            );
        } else {
            warn!(
                regions = regions.len(),
                unresolved = state.working.len(),
                rounds,
                "Round budget exhausted before overlaps were resolved; partition is incomplete"
            );
        }

        ResolveOutcome {
            regions,
            leftover: state.working,
            rounds,
            complete,
            dropped_inputs,
            out_of_range,
            round_stats: state.stats,
        }
    }

    /// Normalize inputs onto the snap grid, dropping invalid ones and
    /// collapsing duplicates.
    ///
    /// Returns the candidates, the number dropped and how many of those were
    /// out of the grid's range.
    fn prepare_inputs(&self, inputs: &[Polygon<f64>]) -> (Vec<Polygon<f64>>, usize, usize) {
        let mut normalized = Vec::with_capacity(inputs.len());
        let mut out_of_range = 0usize;
        let mut invalid = 0usize;
        for input in inputs {
            match self.ops.normalize(input) {
                Ok(polygon) => normalized.push(polygon),
                Err(error) => {
                    if error.is_out_of_range() {
                        out_of_range += 1;
                    } else {
                        invalid += 1;
                    }
                }
            }
        }

        let (working, rejected) = dedupe_valid(&self.ops, normalized);
        let dropped = invalid + out_of_range + rejected;
        if dropped > 0 {
            warn!(
                inputs = inputs.len(),
                dropped,
                out_of_range,
                "Dropped input polygons before resolution"
            );
        }
        (working, dropped, out_of_range)
    }

    fn step(&self, mut state: FoldState, round: usize) -> FoldState {
        let output = round::run_round(&self.ops, round, std::mem::take(&mut state.working));
        debug!(
            round,
            candidates = output.stats.candidates,
            stable = output.stats.stable,
            active = output.stats.active,
            pairs = output.stats.pairs,
            dropped = output.stats.dropped_invalid,
            next = output.stats.next,
            "Resolver round"
        );
        state.stable.extend(output.stable);
        state.working = output.next;
        state.stats.push(output.stats);
        state
    }
}

impl<O: GeometryOps + Default> Default for OverlapResolver<O> {
    fn default() -> Self {
        Self::new(O::default())
    }
}
