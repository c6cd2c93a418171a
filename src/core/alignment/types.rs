//! Parameter and result carriers shared by the score engines.

use crate::config::{GapCosts, SearchType};
use crate::core::alignment::matrix::ScoreMatrix;

/// Everything a score engine needs besides the database sequences.
#[derive(Debug, Clone, Copy)]
pub struct AlignParams<'a> {
    pub search_type: SearchType,
    pub query: &'a [u8],
    pub matrix: &'a ScoreMatrix,
    pub gaps: GapCosts,
}

impl<'a> AlignParams<'a> {
    pub fn new(
        search_type: SearchType,
        query: &'a [u8],
        matrix: &'a ScoreMatrix,
        gaps: GapCosts,
    ) -> Self {
        Self {
            search_type,
            query,
            matrix,
            gaps,
        }
    }
}

/// Per-lane result of one narrow-precision window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneOutcome {
    pub score: i64,
    /// Saturation was observed; `score` is meaningless and the sequence must
    /// be retried at a wider precision.
    pub overflow: bool,
}

impl LaneOutcome {
    #[inline]
    pub fn resolved(score: i64) -> Self {
        Self {
            score,
            overflow: false,
        }
    }

    #[inline]
    pub fn overflowed() -> Self {
        Self {
            score: 0,
            overflow: true,
        }
    }
}
