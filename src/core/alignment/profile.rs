//! Score profile builder.
//!
//! For one search-window step the kernel needs, per query symbol, the
//! substitution score against every database symbol sitting in each lane at
//! each of the `depth` columns. The profile lays that out as
//! `[query symbol][depth step][lane]` so the inner loop does one contiguous
//! vector load per cell.

use super::lanes::ScoreElem;
use super::matrix::ScoreMatrix;

/// Expand `matrix` into the profile for one window step.
///
/// `columns` is laid out `[depth step][lane]` (`columns.len()` must be a
/// multiple of `lanes`); `None` marks a lane whose sequence has ended and
/// yields a zero entry. `out` is resized to `dim * depth * lanes`.
pub fn build_profile<T: ScoreElem>(
    matrix: &ScoreMatrix,
    columns: &[Option<u8>],
    lanes: usize,
    out: &mut Vec<T>,
) {
    debug_assert!(lanes > 0 && columns.len() % lanes == 0);
    let dim = matrix.dim();
    let depth = columns.len() / lanes;
    out.clear();
    out.resize(dim * depth * lanes, T::default());

    for sym in 0..dim {
        let row = matrix.row(sym as u8);
        let dst = &mut out[sym * depth * lanes..(sym + 1) * depth * lanes];
        for (slot, col) in dst.iter_mut().zip(columns) {
            if let Some(db_sym) = *col {
                *slot = T::from_i64_saturating(row[db_sym as usize] as i64);
            }
        }
    }
}
