//! Scalar traceback and CIGAR construction.
//!
//! The winning pair is re-aligned at i64 precision while recording, per cell,
//! which move produced H and whether the E/F values used there were gap
//! extensions. The walk then runs from the alignment end back to its start
//! and the CIGAR is reversed once at the end.
//!
//! Tie rule for H: the left gap (E) first, then the up gap (F), then the
//! diagonal step.
//! A gap value is an extension only when extending strictly beats opening.

use std::ops::Range;

use super::cigar::{Cigar, CigarOp};
use super::types::AlignParams;
use crate::config::SearchType;
use crate::error::{Result, SsaError};

pub const GAP_UP: u8 = 1;
pub const GAP_LEFT: u8 = 2;
pub const GAP_EXT_UP: u8 = 4;
pub const GAP_EXT_LEFT: u8 = 8;
/// Local score clamped at zero: a local path starts after this cell.
pub const ZERO: u8 = 16;

/// Direction flags for a full `query x db` matrix plus the alignment end.
#[derive(Debug, Clone)]
pub struct Directions {
    search_type: SearchType,
    rows: usize,
    cols: usize,
    flags: Vec<u8>,
    score: i64,
    /// Last cell of the path; `None` for an empty local alignment.
    end: Option<(usize, usize)>,
}

impl Directions {
    #[inline]
    pub fn flag(&self, i: usize, j: usize) -> u8 {
        self.flags[i * self.cols + j]
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn end(&self) -> Option<(usize, usize)> {
        self.end
    }
}

/// A traced pairwise alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub score: i64,
    /// Query symbols covered by the path.
    pub query_range: Range<usize>,
    /// Database symbols covered by the path.
    pub db_range: Range<usize>,
    pub cigar: Cigar,
}

impl Alignment {
    /// Score of the path itself: substitution scores for `M`, one affine gap
    /// charge per `I`/`D` run.
    pub fn path_score(&self, params: &AlignParams<'_>, db: &[u8]) -> i64 {
        let query = &params.query[self.query_range.clone()];
        let db = &db[self.db_range.clone()];
        let (mut qi, mut dj) = (0usize, 0usize);
        let mut total = 0i64;
        for &(op, n) in self.cigar.runs() {
            let n = n as usize;
            match op {
                CigarOp::M => {
                    for k in 0..n {
                        total += params.matrix.score(query[qi + k], db[dj + k]) as i64;
                    }
                    qi += n;
                    dj += n;
                }
                CigarOp::I => {
                    total -= params.gaps.run_cost(n);
                    dj += n;
                }
                CigarOp::D => {
                    total -= params.gaps.run_cost(n);
                    qi += n;
                }
            }
        }
        total
    }
}

/// Recompute the DP of `params.query` against `db` with direction flags.
///
/// Only Smith-Waterman and Needleman-Wunsch can be traced.
pub fn compute_directions(params: &AlignParams<'_>, db: &[u8]) -> Result<Directions> {
    let kind = params.search_type;
    if kind == SearchType::NeedlemanWunschSellers {
        log::error!("traceback requested for {kind}");
        return Err(SsaError::UnsupportedSearchType(kind));
    }
    let local = kind == SearchType::SmithWaterman;
    let query = params.query;
    let (rows, cols) = (query.len(), db.len());
    let open = params.gaps.open as i64;
    let extend = params.gaps.extend as i64;
    let oe = open + extend;
    let gap_run = |len: usize| if len == 0 { 0 } else { -(open + len as i64 * extend) };

    let mut flags = vec![0u8; rows * cols];
    let mut h: Vec<i64> = (0..cols).map(|j| if local { 0 } else { gap_run(j + 1) }).collect();
    let mut f: Vec<i64> = h.iter().map(|&v| v - oe).collect();
    let mut f_ext = vec![false; cols];
    let mut best = 0i64;
    let mut end = None;

    for (i, &q) in query.iter().enumerate() {
        let row = params.matrix.row(q);
        let mut diag = if local || i == 0 { 0 } else { gap_run(i) };
        let mut e = if local { 0 } else { gap_run(i + 1) } - oe;
        let mut e_ext = false;

        for (j, &d) in db.iter().enumerate() {
            let mut fl = 0u8;
            if e_ext {
                fl |= GAP_EXT_LEFT;
            }
            if f_ext[j] {
                fl |= GAP_EXT_UP;
            }

            let through = diag + row[d as usize] as i64;
            let mut cell = if e >= through && e >= f[j] {
                fl |= GAP_LEFT;
                e
            } else if f[j] >= through {
                fl |= GAP_UP;
                f[j]
            } else {
                through
            };
            if local {
                if cell <= 0 {
                    cell = 0;
                    fl |= ZERO;
                }
                if cell > best {
                    best = cell;
                    end = Some((i, j));
                }
            }
            flags[i * cols + j] = fl;

            diag = h[j];
            h[j] = cell;
            let opened = cell - oe;
            let f_extended = f[j] - extend;
            f_ext[j] = f_extended > opened;
            f[j] = f_extended.max(opened);
            let e_extended = e - extend;
            e_ext = e_extended > opened;
            e = e_extended.max(opened);
        }
    }

    let score = if local {
        best
    } else if rows == 0 || cols == 0 {
        gap_run(rows.max(cols))
    } else {
        end = Some((rows - 1, cols - 1));
        h[cols - 1]
    };

    Ok(Directions {
        search_type: kind,
        rows,
        cols,
        flags,
        score,
        end,
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Diagonal,
    Left,
    Up,
}

/// Walk `dirs` from the alignment end back to its start.
pub fn traceback(dirs: &Directions) -> Alignment {
    let local = dirs.search_type == SearchType::SmithWaterman;
    let mut cigar = Cigar::new();

    let Some((end_i, end_j)) = dirs.end else {
        // Empty local path, or a global alignment against an empty sequence.
        if !local {
            cigar.push(CigarOp::D, dirs.rows as u32);
            cigar.push(CigarOp::I, dirs.cols as u32);
        }
        let (q, d) = if local { (0, 0) } else { (dirs.rows, dirs.cols) };
        return Alignment {
            score: dirs.score,
            query_range: 0..q,
            db_range: 0..d,
            cigar,
        };
    };

    let (mut i, mut j) = (end_i as isize, end_j as isize);
    let mut state = State::Diagonal;
    while i >= 0 && j >= 0 {
        let fl = dirs.flag(i as usize, j as usize);
        match state {
            State::Diagonal => {
                if local && fl & ZERO != 0 {
                    break;
                }
                if fl & GAP_LEFT != 0 {
                    state = State::Left;
                } else if fl & GAP_UP != 0 {
                    state = State::Up;
                } else {
                    cigar.push(CigarOp::M, 1);
                    i -= 1;
                    j -= 1;
                }
            }
            State::Left => {
                cigar.push(CigarOp::I, 1);
                if fl & GAP_EXT_LEFT == 0 {
                    state = State::Diagonal;
                }
                j -= 1;
            }
            State::Up => {
                cigar.push(CigarOp::D, 1);
                if fl & GAP_EXT_UP == 0 {
                    state = State::Diagonal;
                }
                i -= 1;
            }
        }
    }

    if !local {
        if i >= 0 {
            cigar.push(CigarOp::D, (i + 1) as u32);
        }
        if j >= 0 {
            cigar.push(CigarOp::I, (j + 1) as u32);
        }
        i = -1;
        j = -1;
    }
    cigar.reverse();

    Alignment {
        score: dirs.score,
        query_range: (i + 1) as usize..end_i + 1,
        db_range: (j + 1) as usize..end_j + 1,
        cigar,
    }
}

/// Align one query against one database sequence and trace the path.
pub fn align_pair(params: &AlignParams<'_>, db: &[u8]) -> Result<Alignment> {
    let dirs = compute_directions(params, db)?;
    Ok(traceback(&dirs))
}
