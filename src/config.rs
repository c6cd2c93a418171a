//! Search configuration.
//!
//! One immutable `SearchConfig` value carries everything a search needs
//! (scoring, gap costs, result count, precision and ISA limits). It is handed
//! to `Searcher::new` and lives for the duration of that searcher, so two
//! searches never share mutable settings.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::core::alignment::matrix::ScoreMatrix;
use crate::core::compute::simd_abstraction::SimdCapability;
use crate::defaults;
use crate::error::{Result, SsaError};

/// Alignment recurrence variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchType {
    /// Local alignment, scores clamped at zero.
    SmithWaterman,
    /// Global alignment over both sequences.
    NeedlemanWunsch,
    /// Global in the query, free leading and trailing gaps in the database sequence.
    NeedlemanWunschSellers,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchType::SmithWaterman => "Smith-Waterman",
            SearchType::NeedlemanWunsch => "Needleman-Wunsch",
            SearchType::NeedlemanWunschSellers => "Needleman-Wunsch-Sellers",
        };
        f.write_str(name)
    }
}

impl FromStr for SearchType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sw" | "smith-waterman" => Ok(SearchType::SmithWaterman),
            "nw" | "needleman-wunsch" => Ok(SearchType::NeedlemanWunsch),
            "sellers" | "nw-sellers" => Ok(SearchType::NeedlemanWunschSellers),
            other => Err(format!("unknown search type '{other}' (expected sw, nw or sellers)")),
        }
    }
}

/// Accumulator width a search starts at. Narrow widths escalate on saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BitWidth {
    W8,
    W16,
    W64,
}

impl FromStr for BitWidth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "8" => Ok(BitWidth::W8),
            "16" => Ok(BitWidth::W16),
            "64" => Ok(BitWidth::W64),
            other => Err(format!("bit width must be 8, 16 or 64, got '{other}'")),
        }
    }
}

/// Affine gap costs, both non-negative. A gap of length `L` costs `open + L * extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapCosts {
    pub open: i32,
    pub extend: i32,
}

impl GapCosts {
    pub fn new(open: i32, extend: i32) -> Self {
        Self { open, extend }
    }

    /// Cost of the first gap symbol.
    #[inline]
    pub fn open_extend(&self) -> i32 {
        self.open + self.extend
    }

    /// Total (positive) cost of a gap run of `len` symbols.
    #[inline]
    pub fn run_cost(&self, len: usize) -> i64 {
        if len == 0 {
            0
        } else {
            self.open as i64 + len as i64 * self.extend as i64
        }
    }
}

impl Default for GapCosts {
    fn default() -> Self {
        Self::new(defaults::GAP_OPEN, defaults::GAP_EXTEND)
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub search_type: SearchType,
    pub matrix: Arc<ScoreMatrix>,
    pub gaps: GapCosts,
    /// Number of hits kept in the ranked result (K)
    pub hit_count: usize,
    pub start_width: BitWidth,
    /// Widest ISA tier the search may use; detection can only lower it.
    pub max_capability: SimdCapability,
    /// Database sequences handed to one worker at a time
    pub chunk_size: usize,
    /// Worker threads; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

impl SearchConfig {
    pub fn new(search_type: SearchType, matrix: ScoreMatrix) -> Self {
        Self {
            search_type,
            matrix: Arc::new(matrix),
            gaps: GapCosts::default(),
            hit_count: defaults::HIT_COUNT,
            start_width: BitWidth::W8,
            max_capability: SimdCapability::Avx2,
            chunk_size: defaults::CHUNK_SIZE,
            threads: None,
        }
    }

    pub fn with_gaps(mut self, open: i32, extend: i32) -> Self {
        self.gaps = GapCosts::new(open, extend);
        self
    }

    pub fn with_hit_count(mut self, hit_count: usize) -> Self {
        self.hit_count = hit_count;
        self
    }

    pub fn with_start_width(mut self, width: BitWidth) -> Self {
        self.start_width = width;
        self
    }

    pub fn with_max_capability(mut self, capability: SimdCapability) -> Self {
        self.max_capability = capability;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Validate parameters for consistency.
    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.gaps.open < 0 || self.gaps.extend < 0 {
            errors.push(format!(
                "gap costs must be non-negative, got open={} extend={}",
                self.gaps.open, self.gaps.extend
            ));
        }
        if self.gaps.open.checked_add(self.gaps.extend).is_none() {
            errors.push("gap open + extend overflows i32".to_string());
        }
        if self.hit_count == 0 {
            errors.push("hit count must be >= 1".to_string());
        }
        if self.chunk_size == 0 {
            errors.push("chunk size must be >= 1".to_string());
        }
        if self.threads == Some(0) {
            errors.push("thread count must be >= 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SsaError::InvalidConfig(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::new(SearchType::SmithWaterman, ScoreMatrix::constant(5, 1, -1))
    }

    #[test]
    fn test_defaults_validate() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.hit_count, defaults::HIT_COUNT);
        assert_eq!(cfg.start_width, BitWidth::W8);
        assert_eq!(cfg.gaps, GapCosts::new(defaults::GAP_OPEN, defaults::GAP_EXTEND));
    }

    #[test]
    fn test_validate_collects_errors() {
        let cfg = config().with_gaps(-1, 1).with_hit_count(0).with_threads(0);
        let msg = cfg.validate().unwrap_err().to_string();
        assert!(msg.contains("non-negative"), "{msg}");
        assert!(msg.contains("hit count"), "{msg}");
        assert!(msg.contains("thread count"), "{msg}");
    }

    #[test]
    fn test_gap_run_cost() {
        let gaps = GapCosts::new(3, 1);
        assert_eq!(gaps.open_extend(), 4);
        assert_eq!(gaps.run_cost(0), 0);
        assert_eq!(gaps.run_cost(1), 4);
        assert_eq!(gaps.run_cost(5), 8);
    }

    #[test]
    fn test_parse_search_type_and_width() {
        assert_eq!("sw".parse::<SearchType>(), Ok(SearchType::SmithWaterman));
        assert_eq!("NW".parse::<SearchType>(), Ok(SearchType::NeedlemanWunsch));
        assert_eq!("sellers".parse::<SearchType>(), Ok(SearchType::NeedlemanWunschSellers));
        assert!("blast".parse::<SearchType>().is_err());
        assert_eq!("16".parse::<BitWidth>(), Ok(BitWidth::W16));
        assert!("32".parse::<BitWidth>().is_err());
    }
}
