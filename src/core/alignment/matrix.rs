//! Substitution score matrix.
//!
//! A dense `dim x dim` table of i32 scores indexed by symbol code. File
//! formats (BLOSUM, PAM, ...) are parsed by the caller; this type only holds
//! and validates the numbers.

use crate::error::{Result, SsaError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    dim: usize,
    scores: Vec<i32>,
}

impl ScoreMatrix {
    /// Build from a row-major table; `scores.len()` must equal `dim * dim`.
    pub fn new(dim: usize, scores: Vec<i32>) -> Result<Self> {
        if dim == 0 || dim > 256 {
            return Err(SsaError::InvalidScoring(format!(
                "matrix dimension must be in 1..=256, got {dim}"
            )));
        }
        if scores.len() != dim * dim {
            return Err(SsaError::InvalidScoring(format!(
                "{dim}x{dim} matrix needs {} entries, got {}",
                dim * dim,
                scores.len()
            )));
        }
        Ok(Self { dim, scores })
    }

    /// Build from square rows.
    pub fn from_rows(rows: &[Vec<i32>]) -> Result<Self> {
        let dim = rows.len();
        if let Some(bad) = rows.iter().position(|r| r.len() != dim) {
            return Err(SsaError::InvalidScoring(format!(
                "row {bad} has {} columns, expected {dim}",
                rows[bad].len()
            )));
        }
        Self::new(dim, rows.concat())
    }

    /// Identity-style matrix: `match_score` on the diagonal, `mismatch_score` elsewhere.
    pub fn constant(dim: usize, match_score: i32, mismatch_score: i32) -> Self {
        let scores = (0..dim * dim)
            .map(|k| if k / dim == k % dim { match_score } else { mismatch_score })
            .collect();
        Self { dim, scores }
    }

    /// Number of symbols the matrix is defined over.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.scores[a as usize * self.dim + b as usize]
    }

    /// Scores of symbol `a` against every symbol.
    #[inline]
    pub fn row(&self, a: u8) -> &[i32] {
        let start = a as usize * self.dim;
        &self.scores[start..start + self.dim]
    }

    pub fn min(&self) -> i32 {
        self.scores.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> i32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// Fails with `InvalidSymbol` on the first code outside the alphabet.
    pub fn check_symbols(&self, seq: &[u8]) -> Result<()> {
        match seq.iter().find(|&&s| s as usize >= self.dim) {
            Some(&symbol) => Err(SsaError::InvalidSymbol {
                symbol,
                alphabet: self.dim,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_matrix() {
        let m = ScoreMatrix::constant(5, 2, -3);
        assert_eq!(m.dim(), 5);
        assert_eq!(m.score(1, 1), 2);
        assert_eq!(m.score(1, 4), -3);
        assert_eq!(m.row(0), &[2, -3, -3, -3, -3]);
        assert_eq!((m.min(), m.max()), (-3, 2));
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = ScoreMatrix::from_rows(&[vec![1, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, SsaError::InvalidScoring(_)));
        assert!(ScoreMatrix::new(0, vec![]).is_err());
        assert!(ScoreMatrix::new(2, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_check_symbols() {
        let m = ScoreMatrix::constant(4, 1, -1);
        assert!(m.check_symbols(&[0, 1, 2, 3]).is_ok());
        match m.check_symbols(&[0, 7]) {
            Err(SsaError::InvalidSymbol { symbol, alphabet }) => {
                assert_eq!((symbol, alphabet), (7, 4));
            }
            other => panic!("expected InvalidSymbol, got {other:?}"),
        }
    }
}
