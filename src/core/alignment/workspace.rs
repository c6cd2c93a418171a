//! Thread-local workspace for reusable allocations
//!
//! Each worker thread keeps one `SearchWorkspace` alive for the life of the
//! thread, so the profile, accumulator and retry buffers grow to the largest
//! window seen once and are reused across every chunk the thread processes.

use std::cell::RefCell;

use super::escalation::EscalationBuffers;

// Thread-local workspace for search buffers
thread_local! {
    static WORKSPACE: RefCell<SearchWorkspace> = RefCell::new(SearchWorkspace::new());
}

/// Reusable buffers for scoring one database chunk.
#[derive(Debug, Default)]
pub struct SearchWorkspace {
    /// Kernel scratch plus retry queue for the escalation chain
    pub escalation: EscalationBuffers,
    /// Chunks scored with this workspace so far
    pub chunks_scored: usize,
}

impl SearchWorkspace {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Execute a closure with the thread-local workspace
///
/// The closure must not call `with_workspace` again.
pub fn with_workspace<F, R>(f: F) -> R
where
    F: FnOnce(&mut SearchWorkspace) -> R,
{
    WORKSPACE.with(|ws| f(&mut ws.borrow_mut()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BitWidth, GapCosts, SearchType};
    use crate::core::alignment::escalation::{EscalationStats, resolve_scores};
    use crate::core::alignment::matrix::ScoreMatrix;
    use crate::core::alignment::types::AlignParams;
    use crate::core::compute::simd_abstraction::SimdCapability;

    #[test]
    fn test_workspace_reused_within_thread() {
        let matrix = ScoreMatrix::constant(4, 2, -1);
        let query = [0u8, 1, 2, 3];
        let params = AlignParams::new(SearchType::SmithWaterman, &query, &matrix, GapCosts::new(2, 1));
        let db = [0u8, 1, 2, 3];

        for round in 1..=3 {
            let score = with_workspace(|ws| {
                ws.chunks_scored += 1;
                let mut got = 0;
                resolve_scores(
                    SimdCapability::Portable,
                    BitWidth::W8,
                    &params,
                    &[&db],
                    &mut ws.escalation,
                    &mut EscalationStats::default(),
                    |_, s| got = s,
                )
                .unwrap();
                got
            });
            assert_eq!(score, 8);
            assert!(with_workspace(|ws| ws.chunks_scored) >= round);
        }
    }

    #[test]
    fn test_other_thread_gets_fresh_workspace() {
        with_workspace(|ws| ws.chunks_scored += 10);
        let seen = std::thread::spawn(|| with_workspace(|ws| ws.chunks_scored))
            .join()
            .unwrap();
        assert_eq!(seen, 0);
    }
}
