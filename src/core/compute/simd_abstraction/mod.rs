//! SIMD abstraction layer
//!
//! This module exposes a single, portable surface area for the handful of
//! saturating integer operations the alignment recurrence needs. It hides ISA
//! differences between x86_64 (SSE4.1/AVX2) and everything else (a portable
//! array engine) behind the `SimdEngine` trait.
//!
//! ## Engines and widths
//!
//! - `SimdEngine128`: 128‑bit vectors, 16 lanes of i8 / 8 lanes of i16 (SSE4.1)
//! - `SimdEngine256`: 256‑bit vectors, 32 lanes of i8 / 16 lanes of i16 (AVX2)
//! - `SimdEnginePortable`: plain arrays with the 128‑bit lane counts; used on
//!   non-x86 targets and when a search is capped to `SimdCapability::Portable`
//!
//! ## Runtime dispatch pattern
//!
//! Feature detection runs once per search (`simd::detect_simd_capability()`),
//! is capped by the caller's configured maximum, and the resulting
//! `SimdCapability` picks the monomorphised kernel in
//! `core::alignment::dispatch`.
//!
//! ## Safety model
//!
//! All trait functions are `unsafe` because they may:
//! - require specific CPU features (SSE4.1, AVX2), and
//! - dereference raw pointers for loads/stores.
//!
//! Callers must ensure that the chosen engine matches the CPU's supported
//! features (the dispatcher does this) and that pointer arguments are valid for
//! `WIDTH_8` / `WIDTH_16` elements.

/// Trait for a generic SIMD engine, providing the saturating integer operations
/// used by the inter-sequence alignment kernel.
pub trait SimdEngine: Sized + Copy {
    /// Number of 8‑bit lanes in the engine's native vector type.
    const WIDTH_8: usize;
    /// Number of 16‑bit lanes in the engine's native vector type.
    const WIDTH_16: usize;

    /// Architecture‑specific 8‑bit vector type used by this engine.
    type Vec8: Copy;
    /// Architecture‑specific 16‑bit vector type used by this engine.
    type Vec16: Copy;

    // ===== 8-bit lanes =====
    /// Broadcast a scalar i8 into all lanes.
    unsafe fn set1_epi8(a: i8) -> Self::Vec8;
    /// Load `WIDTH_8` signed bytes from an unaligned pointer.
    unsafe fn loadu_epi8(p: *const i8) -> Self::Vec8;
    /// Store `WIDTH_8` signed bytes to an unaligned pointer.
    unsafe fn storeu_epi8(p: *mut i8, a: Self::Vec8);
    /// Per‑lane saturated add of signed i8 lanes.
    unsafe fn adds_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8;
    /// Per‑lane saturated subtract of signed i8 lanes.
    unsafe fn subs_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8;
    /// Per‑lane max of signed i8 lanes.
    unsafe fn max_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8;
    /// Per‑lane min of signed i8 lanes.
    unsafe fn min_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8;

    // ===== 16-bit lanes =====
    /// Broadcast a scalar i16 into all lanes.
    unsafe fn set1_epi16(a: i16) -> Self::Vec16;
    /// Load `WIDTH_16` signed words from an unaligned pointer.
    unsafe fn loadu_epi16(p: *const i16) -> Self::Vec16;
    /// Store `WIDTH_16` signed words to an unaligned pointer.
    unsafe fn storeu_epi16(p: *mut i16, a: Self::Vec16);
    /// Per‑lane saturated add of signed i16 lanes.
    unsafe fn adds_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16;
    /// Per‑lane saturated subtract of signed i16 lanes.
    unsafe fn subs_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16;
    /// Per‑lane max of signed i16 lanes.
    unsafe fn max_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16;
    /// Per‑lane min of signed i16 lanes.
    unsafe fn min_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16;
}

#[cfg(target_arch = "x86_64")]
pub mod engine128;
#[cfg(target_arch = "x86_64")]
pub mod engine256;
pub mod portable;
pub mod simd;

#[cfg(target_arch = "x86_64")]
pub use engine128::SimdEngine128;
#[cfg(target_arch = "x86_64")]
pub use engine256::SimdEngine256;
pub use portable::SimdEnginePortable;
pub use simd::{SimdCapability, detect_simd_capability, effective_capability};

#[cfg(test)]
mod tests {
    use super::*;

    // Every engine must agree with scalar saturating arithmetic lane by lane.
    unsafe fn check_engine_8<E: SimdEngine>() {
        let a: Vec<i8> = (0..E::WIDTH_8).map(|i| (i as i8).wrapping_mul(37)).collect();
        let b: Vec<i8> = (0..E::WIDTH_8)
            .map(|i| 120i8.wrapping_sub((i as i8).wrapping_mul(11)))
            .collect();
        let va = E::loadu_epi8(a.as_ptr());
        let vb = E::loadu_epi8(b.as_ptr());

        let mut out = vec![0i8; E::WIDTH_8];
        E::storeu_epi8(out.as_mut_ptr(), E::adds_epi8(va, vb));
        for i in 0..E::WIDTH_8 {
            assert_eq!(out[i], a[i].saturating_add(b[i]), "adds lane {i}");
        }
        E::storeu_epi8(out.as_mut_ptr(), E::subs_epi8(va, vb));
        for i in 0..E::WIDTH_8 {
            assert_eq!(out[i], a[i].saturating_sub(b[i]), "subs lane {i}");
        }
        E::storeu_epi8(out.as_mut_ptr(), E::max_epi8(va, vb));
        for i in 0..E::WIDTH_8 {
            assert_eq!(out[i], a[i].max(b[i]), "max lane {i}");
        }
        E::storeu_epi8(out.as_mut_ptr(), E::min_epi8(va, E::set1_epi8(-3)));
        for i in 0..E::WIDTH_8 {
            assert_eq!(out[i], a[i].min(-3), "min lane {i}");
        }
    }

    unsafe fn check_engine_16<E: SimdEngine>() {
        let a: Vec<i16> = (0..E::WIDTH_16)
            .map(|i| 32_000i16.wrapping_sub((i as i16).wrapping_mul(9_000)))
            .collect();
        let b: Vec<i16> = (0..E::WIDTH_16).map(|i| (i as i16).wrapping_mul(4_000)).collect();
        let va = E::loadu_epi16(a.as_ptr());
        let vb = E::loadu_epi16(b.as_ptr());

        let mut out = vec![0i16; E::WIDTH_16];
        E::storeu_epi16(out.as_mut_ptr(), E::adds_epi16(va, vb));
        for i in 0..E::WIDTH_16 {
            assert_eq!(out[i], a[i].saturating_add(b[i]), "adds lane {i}");
        }
        E::storeu_epi16(out.as_mut_ptr(), E::subs_epi16(vb, va));
        for i in 0..E::WIDTH_16 {
            assert_eq!(out[i], b[i].saturating_sub(a[i]), "subs lane {i}");
        }
        E::storeu_epi16(out.as_mut_ptr(), E::max_epi16(va, vb));
        for i in 0..E::WIDTH_16 {
            assert_eq!(out[i], a[i].max(b[i]), "max lane {i}");
        }
        E::storeu_epi16(out.as_mut_ptr(), E::min_epi16(va, E::set1_epi16(7)));
        for i in 0..E::WIDTH_16 {
            assert_eq!(out[i], a[i].min(7), "min lane {i}");
        }
    }

    #[test]
    fn portable_engine_matches_scalar_saturation() {
        unsafe {
            check_engine_8::<SimdEnginePortable>();
            check_engine_16::<SimdEnginePortable>();
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn sse41_engine_matches_scalar_saturation() {
        if !is_x86_feature_detected!("sse4.1") {
            return;
        }
        unsafe {
            check_engine_8::<SimdEngine128>();
            check_engine_16::<SimdEngine128>();
        }
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn avx2_engine_matches_scalar_saturation() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }
        unsafe {
            check_engine_8::<SimdEngine256>();
            check_engine_16::<SimdEngine256>();
        }
    }
}
