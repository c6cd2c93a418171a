//! Inter-sequence vector recurrence (8/16-bit).
//!
//! Each lane carries one database sequence; the query runs down the rows.
//! A window of up to `L::LANES` sequences is swept column-block by
//! column-block, `CDEPTH` database columns per step, and every query row
//! updates those columns for all lanes at once. Lanes advance at the pace of
//! the longest sequence in the window; a lane whose sequence has ended sees a
//! zero profile and is excluded from maxima and saturation tracking.
//!
//! Per cell (gap costs are non-negative, `oe = open + extend`):
//!
//! ```text
//! E(i,j) = max(E(i,j-1) - extend, H(i,j-1) - oe)   // left gap, consumes db
//! F(i,j) = max(F(i-1,j) - extend, H(i-1,j) - oe)   // up gap, consumes query
//! H(i,j) = max(H(i-1,j-1) + s(q_i, d_j), E(i,j), F(i,j))
//! ```
//!
//! Smith-Waterman runs in a biased domain: the stored value is
//! `score + T::MIN`, so saturating subtraction floors at score zero and the
//! local clamp comes for free. A lane overflowed when its running maximum
//! reached `T::MAX`.
//!
//! Needleman-Wunsch and Sellers run unbiased. A lane overflowed when any of
//! its cells touched `T::MAX` or `T::MIN`, or when a boundary gap run it
//! depends on is not representable.
//!
//! `hearray` holds, for every query row, the H vector of the last processed
//! column and the E vector for the next column (`[row][h|e][lane]`).

use super::lanes::{ScoreElem, ScoreLanes};
use super::profile::build_profile;
use super::types::{AlignParams, LaneOutcome};
use crate::config::SearchType;
use crate::defaults::CDEPTH;

/// Buffers reused across windows for one element width.
#[derive(Debug, Default)]
pub struct KernelScratch<T> {
    hearray: Vec<T>,
    profile: Vec<T>,
    columns: Vec<Option<u8>>,
    cap_hi: Vec<T>,
    cap_lo: Vec<T>,
    lane_tmp: Vec<T>,
    hi_tmp: Vec<T>,
    lo_tmp: Vec<T>,
    end_scores: Vec<i64>,
}

impl<T: ScoreElem> KernelScratch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&mut self, rows: usize, lanes: usize, windows: usize) {
        self.hearray.resize(2 * rows * lanes, T::default());
        self.columns.resize(CDEPTH * lanes, None);
        self.cap_hi.resize(CDEPTH * lanes, T::default());
        self.cap_lo.resize(CDEPTH * lanes, T::default());
        self.lane_tmp.resize(lanes, T::default());
        self.hi_tmp.resize(lanes, T::default());
        self.lo_tmp.resize(lanes, T::default());
        self.end_scores.clear();
        self.end_scores.resize(windows, 0);
    }
}

/// Score one window of database sequences against the query.
///
/// Appends one `LaneOutcome` per sequence of `window`, in order.
///
/// # Safety
/// `L` must be runnable on the current CPU. `window` must hold between 1 and
/// `L::LANES` non-empty sequences, the query must be non-empty, and every
/// symbol must be below `params.matrix.dim()`.
#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn search_window<L: ScoreLanes>(
    params: &AlignParams<'_>,
    window: &[&[u8]],
    scratch: &mut KernelScratch<L::Elem>,
    out: &mut Vec<LaneOutcome>,
) {
    let lanes = L::LANES;
    let query = params.query;
    let rows = query.len();
    debug_assert!(!window.is_empty() && window.len() <= lanes);
    debug_assert!(rows > 0 && window.iter().all(|s| !s.is_empty()));

    let kind = params.search_type;
    let local = kind == SearchType::SmithWaterman;
    let open = params.gaps.open as i64;
    let extend = params.gaps.extend as i64;
    let oe = open + extend;
    let t_min = L::Elem::MIN;
    let t_max = L::Elem::MAX;
    let from = L::Elem::from_i64_saturating;

    // Leading query gaps are shared by every lane of the window.
    if !local && !L::Elem::fits_strict(-(open + rows as i64 * extend) - oe) {
        out.extend(window.iter().map(|_| LaneOutcome::overflowed()));
        return;
    }

    scratch.prepare(rows, lanes, window.len());
    for i in 0..rows {
        let (h, e) = if local {
            (t_min, t_min)
        } else {
            let h = -(open + (i as i64 + 1) * extend);
            (from(h), from(h - oe))
        };
        let row = &mut scratch.hearray[2 * i * lanes..2 * (i + 1) * lanes];
        row[..lanes].fill(h);
        row[lanes..].fill(e);
    }

    let v_oe = L::splat(from(oe));
    let v_ext = L::splat(from(extend));
    // Running maximum: over all cells (SW) or over the last row (Sellers).
    let mut best = L::splat(t_min);
    let mut hi = L::splat(t_min);
    let mut lo = L::splat(t_max);

    let max_len = window.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut j0 = 0;
    while j0 < max_len {
        for d in 0..CDEPTH {
            for lane in 0..lanes {
                let sym = window.get(lane).and_then(|s| s.get(j0 + d)).copied();
                let k = d * lanes + lane;
                scratch.columns[k] = sym;
                scratch.cap_hi[k] = if sym.is_some() { t_max } else { t_min };
                scratch.cap_lo[k] = if sym.is_some() { t_min } else { t_max };
            }
        }
        build_profile(params.matrix, &scratch.columns, lanes, &mut scratch.profile);

        // Top boundary row H(-1, j) and the F it opens.
        let top = |j: usize| match kind {
            SearchType::SmithWaterman => t_min,
            SearchType::NeedlemanWunschSellers => from(0),
            SearchType::NeedlemanWunsch => from(-(open + (j as i64 + 1) * extend)),
        };
        let mut h_up = [L::splat(t_min); CDEPTH];
        let mut f = [L::splat(t_min); CDEPTH];
        let mut cap_hi = [L::splat(t_min); CDEPTH];
        let mut cap_lo = [L::splat(t_max); CDEPTH];
        for d in 0..CDEPTH {
            h_up[d] = L::splat(top(j0 + d));
            f[d] = L::subs(h_up[d], v_oe);
            cap_hi[d] = L::load(scratch.cap_hi.as_ptr().add(d * lanes));
            cap_lo[d] = L::load(scratch.cap_lo.as_ptr().add(d * lanes));
        }
        let mut diag0 = match kind {
            SearchType::NeedlemanWunsch if j0 > 0 => L::splat(top(j0 - 1)),
            SearchType::SmithWaterman => L::splat(t_min),
            _ => L::splat(from(0)),
        };

        let hp = scratch.hearray.as_mut_ptr();
        let prof = scratch.profile.as_ptr();
        for (i, &q) in query.iter().enumerate() {
            let row = hp.add(2 * i * lanes);
            let mut e = L::load(row.add(lanes));
            let mut diag = diag0;
            diag0 = L::load(row);
            let prow = prof.add(q as usize * CDEPTH * lanes);

            for d in 0..CDEPTH {
                let mut h = L::adds(diag, L::load(prow.add(d * lanes)));
                h = L::max(h, f[d]);
                h = L::max(h, e);
                if local {
                    best = L::max(best, L::min(h, cap_hi[d]));
                } else {
                    hi = L::max(hi, L::min(h, cap_hi[d]));
                    lo = L::min(lo, L::max(h, cap_lo[d]));
                }
                diag = h_up[d];
                h_up[d] = h;

                let hoe = L::subs(h, v_oe);
                f[d] = L::max(L::subs(f[d], v_ext), hoe);
                e = L::max(L::subs(e, v_ext), hoe);
            }

            L::store(row, h_up[CDEPTH - 1]);
            L::store(row.add(lanes), e);
        }

        // h_up now holds the last query row for columns j0..j0 + CDEPTH.
        match kind {
            SearchType::SmithWaterman => {}
            SearchType::NeedlemanWunschSellers => {
                for d in 0..CDEPTH {
                    best = L::max(best, L::min(h_up[d], cap_hi[d]));
                }
            }
            SearchType::NeedlemanWunsch => {
                for d in 0..CDEPTH {
                    let end = j0 + d + 1;
                    if !window.iter().any(|s| s.len() == end) {
                        continue;
                    }
                    L::store(scratch.lane_tmp.as_mut_ptr(), h_up[d]);
                    for (lane, seq) in window.iter().enumerate() {
                        if seq.len() == end {
                            scratch.end_scores[lane] = scratch.lane_tmp[lane].to_i64();
                        }
                    }
                }
            }
        }

        j0 += CDEPTH;
    }

    if local {
        L::store(scratch.lane_tmp.as_mut_ptr(), best);
        let bias = t_min.to_i64();
        out.extend(scratch.lane_tmp[..window.len()].iter().map(|&v| {
            if v == t_max {
                LaneOutcome::overflowed()
            } else {
                LaneOutcome::resolved(v.to_i64() - bias)
            }
        }));
        return;
    }

    L::store(scratch.hi_tmp.as_mut_ptr(), hi);
    L::store(scratch.lo_tmp.as_mut_ptr(), lo);
    if kind == SearchType::NeedlemanWunschSellers {
        L::store(scratch.lane_tmp.as_mut_ptr(), best);
    }

    for (lane, seq) in window.iter().enumerate() {
        let saturated = scratch.hi_tmp[lane] == t_max || scratch.lo_tmp[lane] == t_min;
        let outcome = match kind {
            SearchType::NeedlemanWunsch => {
                let top_fits = L::Elem::fits_strict(-(open + seq.len() as i64 * extend) - oe);
                if saturated || !top_fits {
                    LaneOutcome::overflowed()
                } else {
                    LaneOutcome::resolved(scratch.end_scores[lane])
                }
            }
            _ if saturated => LaneOutcome::overflowed(),
            _ => LaneOutcome::resolved(scratch.lane_tmp[lane].to_i64()),
        };
        out.push(outcome);
    }
}
