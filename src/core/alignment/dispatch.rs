//! Kernel selection by precision and SIMD capability.
//!
//! The generic recurrence is monomorphised per (width, engine) pair here. x86
//! engines are entered through `#[target_feature]` wrappers so the engine
//! methods inline into a function compiled for that ISA.

use super::escalation::Precision;
use super::kernel::{KernelScratch, search_window};
use super::lanes::{Lanes16, Lanes8, ScoreLanes};
use super::scalar::scalar_score;
use super::types::{AlignParams, LaneOutcome};
#[cfg(target_arch = "x86_64")]
use crate::core::compute::simd_abstraction::{SimdEngine128, SimdEngine256};
use crate::core::compute::simd_abstraction::{SimdCapability, SimdEnginePortable};
use crate::error::Result;

/// Widest lane count of any engine, sizes the stack window buffer.
const MAX_LANES: usize = 32;

/// Kernel buffers for both narrow widths.
#[derive(Debug, Default)]
pub struct KernelBuffers {
    pub narrow8: KernelScratch<i8>,
    pub narrow16: KernelScratch<i16>,
    staging: Staging,
}

/// Indices that enter the kernel and the outcomes it produced for them.
#[derive(Debug, Default)]
struct Staging {
    live: Vec<usize>,
    outcomes: Vec<LaneOutcome>,
}

/// Lanes per window for a precision on a capability (1 for the scalar tier).
pub fn lanes_for(capability: SimdCapability, precision: Precision) -> usize {
    match precision {
        Precision::Narrow8 => capability.lanes_8(),
        Precision::Narrow16 => capability.lanes_16(),
        Precision::Exact64 => 1,
    }
}

/// Drop to a tier the running CPU can execute.
#[inline]
fn clamp_to_cpu(capability: SimdCapability) -> SimdCapability {
    #[cfg(target_arch = "x86_64")]
    {
        match capability {
            SimdCapability::Avx2 if is_x86_feature_detected!("avx2") => SimdCapability::Avx2,
            SimdCapability::Avx2 | SimdCapability::Sse41 if is_x86_feature_detected!("sse4.1") => {
                SimdCapability::Sse41
            }
            _ => SimdCapability::Portable,
        }
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = capability;
        SimdCapability::Portable
    }
}

/// Score `seqs[idx]` for every `idx` in `indices` at a narrow precision.
///
/// Sequences are packed into windows of the engine's lane count in the order
/// given; `out` receives one outcome per index, in order. `Exact64` is not a
/// window precision and produces no output.
///
/// Fails with `InvalidSymbol` when the query or a selected sequence holds a
/// code outside the matrix alphabet; nothing is appended in that case.
pub fn run_narrow(
    capability: SimdCapability,
    precision: Precision,
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    buffers: &mut KernelBuffers,
    out: &mut Vec<LaneOutcome>,
) -> Result<()> {
    params.matrix.check_symbols(params.query)?;
    for &idx in indices {
        params.matrix.check_symbols(seqs[idx])?;
    }
    // SAFETY: every symbol that reaches the kernel was checked above.
    unsafe { run_narrow_unchecked(capability, precision, params, seqs, indices, buffers, out) };
    Ok(())
}

/// `run_narrow` without the symbol check.
///
/// Empty sequences (and every sequence when the query is empty) are scored
/// by the exact engine. When the scoring scheme does not fit `precision`
/// every lane is reported as overflowed.
///
/// # Safety
/// Every symbol of `params.query` and of `seqs[idx]` for `idx` in `indices`
/// must be below `params.matrix.dim()`.
#[allow(unsafe_op_in_unsafe_fn)]
pub(crate) unsafe fn run_narrow_unchecked(
    capability: SimdCapability,
    precision: Precision,
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    buffers: &mut KernelBuffers,
    out: &mut Vec<LaneOutcome>,
) {
    if precision == Precision::Exact64 {
        return;
    }
    if !precision.supports(params.matrix, params.gaps) {
        log::trace!("scoring scheme does not fit {precision}, flagging {} lanes", indices.len());
        out.extend(indices.iter().map(|_| LaneOutcome::overflowed()));
        return;
    }

    let capability = clamp_to_cpu(capability);
    let KernelBuffers {
        narrow8,
        narrow16,
        staging,
    } = buffers;
    staging.live.clear();
    staging.outcomes.clear();
    if !params.query.is_empty() {
        staging
            .live
            .extend(indices.iter().copied().filter(|&idx| !seqs[idx].is_empty()));
    }
    log::trace!(
        "{} windows of {} sequences on {capability}",
        precision,
        staging.live.len()
    );

    let live = staging.live.as_slice();
    let kernel_out = &mut staging.outcomes;
    // `clamp_to_cpu` guarantees the selected engine's features, the caller
    // guarantees the symbols and `live` holds only non-empty sequences.
    match (precision, capability) {
        #[cfg(target_arch = "x86_64")]
        (Precision::Narrow8, SimdCapability::Avx2) => avx2_8(params, seqs, live, narrow8, kernel_out),
        #[cfg(target_arch = "x86_64")]
        (Precision::Narrow8, SimdCapability::Sse41) => sse41_8(params, seqs, live, narrow8, kernel_out),
        #[cfg(target_arch = "x86_64")]
        (Precision::Narrow16, SimdCapability::Avx2) => avx2_16(params, seqs, live, narrow16, kernel_out),
        #[cfg(target_arch = "x86_64")]
        (Precision::Narrow16, SimdCapability::Sse41) => sse41_16(params, seqs, live, narrow16, kernel_out),
        (Precision::Narrow8, _) => {
            run_windows::<Lanes8<SimdEnginePortable>>(params, seqs, live, narrow8, kernel_out)
        }
        _ => run_windows::<Lanes16<SimdEnginePortable>>(params, seqs, live, narrow16, kernel_out),
    }

    // Merge kernel lanes back with the sequences it never saw.
    let mut from_kernel = staging.outcomes.iter();
    for &idx in indices {
        let seq = seqs[idx];
        let outcome = if params.query.is_empty() || seq.is_empty() {
            LaneOutcome::resolved(scalar_score(params, seq))
        } else {
            from_kernel.next().copied().unwrap_or_else(LaneOutcome::overflowed)
        };
        out.push(outcome);
    }
}

#[inline]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn run_windows<L: ScoreLanes>(
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    scratch: &mut KernelScratch<L::Elem>,
    out: &mut Vec<LaneOutcome>,
) {
    debug_assert!(L::LANES <= MAX_LANES);
    let mut window: [&[u8]; MAX_LANES] = [&[]; MAX_LANES];
    for group in indices.chunks(L::LANES) {
        for (slot, &idx) in window.iter_mut().zip(group) {
            *slot = seqs[idx];
        }
        search_window::<L>(params, &window[..group.len()], scratch, out);
    }
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn avx2_8(
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    scratch: &mut KernelScratch<i8>,
    out: &mut Vec<LaneOutcome>,
) {
    run_windows::<Lanes8<SimdEngine256>>(params, seqs, indices, scratch, out)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn avx2_16(
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    scratch: &mut KernelScratch<i16>,
    out: &mut Vec<LaneOutcome>,
) {
    run_windows::<Lanes16<SimdEngine256>>(params, seqs, indices, scratch, out)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn sse41_8(
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    scratch: &mut KernelScratch<i8>,
    out: &mut Vec<LaneOutcome>,
) {
    run_windows::<Lanes8<SimdEngine128>>(params, seqs, indices, scratch, out)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse4.1")]
#[allow(unsafe_op_in_unsafe_fn)]
unsafe fn sse41_16(
    params: &AlignParams<'_>,
    seqs: &[&[u8]],
    indices: &[usize],
    scratch: &mut KernelScratch<i16>,
    out: &mut Vec<LaneOutcome>,
) {
    run_windows::<Lanes16<SimdEngine128>>(params, seqs, indices, scratch, out)
}
