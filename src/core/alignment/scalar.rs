//! Exact 64-bit score engine.
//!
//! Scalar Gotoh recurrence with the same boundary conditions as the vector
//! kernel. It is the final escalation tier and the reference every narrow
//! result is checked against in tests.

use super::types::AlignParams;
use crate::config::SearchType;

/// Optimal alignment score of `params.query` against `db`.
///
/// Empty inputs are handled here: SW scores 0, NW pays the full gap run of
/// the non-empty side, Sellers pays only for an unconsumed query.
pub fn scalar_score(params: &AlignParams<'_>, db: &[u8]) -> i64 {
    let query = params.query;
    let kind = params.search_type;
    let open = params.gaps.open as i64;
    let extend = params.gaps.extend as i64;
    let oe = open + extend;
    let gap_run = |len: usize| if len == 0 { 0 } else { -(open + len as i64 * extend) };

    if query.is_empty() || db.is_empty() {
        return match kind {
            SearchType::SmithWaterman => 0,
            SearchType::NeedlemanWunsch => gap_run(query.len().max(db.len())),
            SearchType::NeedlemanWunschSellers => gap_run(query.len()),
        };
    }

    let top = |j: usize| match kind {
        SearchType::NeedlemanWunsch => gap_run(j + 1),
        _ => 0,
    };
    // h[j] = H(i-1, j) before row i is processed, f[j] = F(i, j).
    let mut h: Vec<i64> = (0..db.len()).map(top).collect();
    let mut f: Vec<i64> = h.iter().map(|&v| v - oe).collect();
    let mut best = 0i64;

    for (i, &q) in query.iter().enumerate() {
        let row = params.matrix.row(q);
        let left = match kind {
            SearchType::SmithWaterman => 0,
            _ => gap_run(i + 1),
        };
        let mut diag = match kind {
            SearchType::SmithWaterman => 0,
            _ if i == 0 => 0,
            _ => gap_run(i),
        };
        let mut e = left - oe;

        for (j, &d) in db.iter().enumerate() {
            let mut cell = (diag + row[d as usize] as i64).max(e).max(f[j]);
            if kind == SearchType::SmithWaterman {
                cell = cell.max(0);
                best = best.max(cell);
            }
            diag = h[j];
            h[j] = cell;
            f[j] = (f[j] - extend).max(cell - oe);
            e = (e - extend).max(cell - oe);
        }
    }

    match kind {
        SearchType::SmithWaterman => best,
        SearchType::NeedlemanWunsch => h[db.len() - 1],
        SearchType::NeedlemanWunschSellers => h.iter().copied().max().unwrap_or(0),
    }
}
