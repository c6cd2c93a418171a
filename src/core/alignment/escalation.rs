//! Overflow detection and precision escalation.
//!
//! Every database sequence starts at the configured width and walks
//! `Narrow8 -> Narrow16 -> Exact64`, moving up a tier exactly when its lane
//! saturated. A sequence is resolved the first time a pass completes without
//! saturation and unconditionally at `Exact64`; resolved sequences are never
//! looked at again. Tiers whose domain cannot represent the scoring scheme
//! (matrix entries or `open + extend`) are skipped outright.

use std::fmt;

use super::dispatch::{KernelBuffers, run_narrow_unchecked};
use super::lanes::ScoreElem;
use super::matrix::ScoreMatrix;
use super::scalar::scalar_score;
use super::types::{AlignParams, LaneOutcome};
use crate::config::{BitWidth, GapCosts};
use crate::core::compute::simd_abstraction::SimdCapability;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precision {
    Narrow8,
    Narrow16,
    Exact64,
}

impl Precision {
    pub fn from_width(width: BitWidth) -> Self {
        match width {
            BitWidth::W8 => Precision::Narrow8,
            BitWidth::W16 => Precision::Narrow16,
            BitWidth::W64 => Precision::Exact64,
        }
    }

    /// The next wider tier, `None` after `Exact64`.
    pub fn next(self) -> Option<Self> {
        match self {
            Precision::Narrow8 => Some(Precision::Narrow16),
            Precision::Narrow16 => Some(Precision::Exact64),
            Precision::Exact64 => None,
        }
    }

    /// The scoring scheme is representable at this width.
    pub fn supports(self, matrix: &ScoreMatrix, gaps: GapCosts) -> bool {
        fn fits<T: ScoreElem>(matrix: &ScoreMatrix, gaps: GapCosts) -> bool {
            T::fits(matrix.min() as i64)
                && T::fits(matrix.max() as i64)
                && T::fits(gaps.open_extend() as i64)
        }
        match self {
            Precision::Narrow8 => fits::<i8>(matrix, gaps),
            Precision::Narrow16 => fits::<i16>(matrix, gaps),
            Precision::Exact64 => true,
        }
    }

    /// `self` or the first wider tier that supports the scoring scheme.
    pub fn first_usable(self, matrix: &ScoreMatrix, gaps: GapCosts) -> Self {
        let mut tier = self;
        while !tier.supports(matrix, gaps) {
            match tier.next() {
                Some(next) => tier = next,
                None => break,
            }
        }
        tier
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Precision::Narrow8 => "8-bit",
            Precision::Narrow16 => "16-bit",
            Precision::Exact64 => "64-bit",
        };
        f.write_str(name)
    }
}

/// Index-based retry queue: sequences still to score at the current tier,
/// and those that saturated and move on to the next one.
#[derive(Debug, Default)]
pub struct RetryQueue {
    pending: Vec<usize>,
    overflowed: Vec<usize>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.overflowed.clear();
    }

    pub fn push(&mut self, idx: usize) {
        self.pending.push(idx);
    }

    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Split `outcomes` (aligned with `pending`) into resolved scores and
    /// retries; returns the number of retries.
    pub fn triage(&mut self, outcomes: &[LaneOutcome], mut resolved: impl FnMut(usize, i64)) -> usize {
        debug_assert_eq!(outcomes.len(), self.pending.len());
        self.overflowed.clear();
        for (&idx, outcome) in self.pending.iter().zip(outcomes) {
            if outcome.overflow {
                self.overflowed.push(idx);
            } else {
                resolved(idx, outcome.score);
            }
        }
        self.overflowed.len()
    }

    /// Retries become the pending set of the next tier.
    pub fn advance(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.overflowed);
        self.overflowed.clear();
    }
}

/// Escalation counters reported with every search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EscalationStats {
    /// Sequences that saturated at 8 bits.
    pub overflow_8_bit: usize,
    /// Sequences that saturated at 16 bits.
    pub overflow_16_bit: usize,
}

impl EscalationStats {
    pub fn record(&mut self, tier: Precision, count: usize) {
        match tier {
            Precision::Narrow8 => self.overflow_8_bit += count,
            Precision::Narrow16 => self.overflow_16_bit += count,
            Precision::Exact64 => {}
        }
    }

    pub fn merge(&mut self, other: EscalationStats) {
        self.overflow_8_bit += other.overflow_8_bit;
        self.overflow_16_bit += other.overflow_16_bit;
    }
}

/// Reusable buffers for one escalation chain.
#[derive(Debug, Default)]
pub struct EscalationBuffers {
    pub kernels: KernelBuffers,
    queue: RetryQueue,
    direct: Vec<usize>,
    outcomes: Vec<LaneOutcome>,
}

impl EscalationBuffers {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Resolve the score of every sequence in `seqs` for one query channel.
///
/// `emit(index, score)` is called exactly once per sequence. Empty sequences
/// (or an empty query) go straight to the exact engine and are not counted
/// as overflows.
///
/// Fails with `InvalidSymbol`, before any score is emitted, when the query or
/// a sequence holds a code outside the matrix alphabet.
pub fn resolve_scores(
    capability: SimdCapability,
    start: BitWidth,
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    buffers: &mut EscalationBuffers,
    stats: &mut EscalationStats,
    mut emit: impl FnMut(usize, i64),
) -> Result<()> {
    params.matrix.check_symbols(params.query)?;
    for seq in seqs {
        params.matrix.check_symbols(seq)?;
    }

    let EscalationBuffers {
        kernels,
        queue,
        direct,
        outcomes,
    } = buffers;
    queue.clear();
    direct.clear();

    for (idx, seq) in seqs.iter().enumerate() {
        if seq.is_empty() || params.query.is_empty() {
            direct.push(idx);
        } else {
            queue.push(idx);
        }
    }

    let mut tier = Precision::from_width(start).first_usable(params.matrix, params.gaps);
    while tier != Precision::Exact64 && !queue.is_empty() {
        outcomes.clear();
        // SAFETY: all symbols were checked on entry.
        unsafe { run_narrow_unchecked(capability, tier, params, seqs, queue.pending(), kernels, outcomes) };
        let retries = queue.triage(outcomes, &mut emit);
        stats.record(tier, retries);
        if retries > 0 {
            log::debug!("{retries} sequences saturated at {tier}, escalating");
        }
        queue.advance();
        tier = match tier.next() {
            Some(next) => next.first_usable(params.matrix, params.gaps),
            None => Precision::Exact64,
        };
    }

    for &idx in queue.pending().iter().chain(direct.iter()) {
        emit(idx, scalar_score(params, seqs[idx]));
    }
    Ok(())
}
