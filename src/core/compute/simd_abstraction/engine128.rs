//! 128‑bit SIMD engine (SSE4.1 on x86_64)
//!
//! Implements the `SimdEngine` backend on `__m128i`. Saturating add/sub on both
//! widths and the i16 max/min are plain SSE2; the signed i8 max/min are SSE4.1,
//! so every method is compiled with `sse4.1` enabled and the dispatcher only
//! selects this engine once the feature has been detected.
//!
//! Safety
//! - All functions are `unsafe` and expect the caller to execute them on a CPU
//!   that supports SSE4.1.
//! - Pointer arguments to loads/stores must be valid for 16 bytes.

use std::arch::x86_64::*;

use super::SimdEngine;

/// 128-bit SIMD engine (SSE4.1)
///
/// Provides 16-way parallelism for 8-bit scores and 8-way for 16-bit scores.
#[derive(Clone, Copy)]
pub struct SimdEngine128;

#[allow(unsafe_op_in_unsafe_fn)]
impl SimdEngine for SimdEngine128 {
    const WIDTH_8: usize = 16; // 128 bits ÷ 8 bits = 16 lanes
    const WIDTH_16: usize = 8; // 128 bits ÷ 16 bits = 8 lanes

    type Vec8 = __m128i;
    type Vec16 = __m128i;

    // ===== 8-bit lanes =====

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn set1_epi8(a: i8) -> Self::Vec8 {
        _mm_set1_epi8(a)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn loadu_epi8(p: *const i8) -> Self::Vec8 {
        _mm_loadu_si128(p as *const __m128i)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn storeu_epi8(p: *mut i8, a: Self::Vec8) {
        _mm_storeu_si128(p as *mut __m128i, a)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn adds_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm_adds_epi8(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn subs_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm_subs_epi8(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn max_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm_max_epi8(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn min_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm_min_epi8(a, b)
    }

    // ===== 16-bit lanes =====

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn set1_epi16(a: i16) -> Self::Vec16 {
        _mm_set1_epi16(a)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn loadu_epi16(p: *const i16) -> Self::Vec16 {
        _mm_loadu_si128(p as *const __m128i)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn storeu_epi16(p: *mut i16, a: Self::Vec16) {
        _mm_storeu_si128(p as *mut __m128i, a)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn adds_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm_adds_epi16(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn subs_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm_subs_epi16(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn max_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm_max_epi16(a, b)
    }

    #[inline]
    #[target_feature(enable = "sse4.1")]
    unsafe fn min_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm_min_epi16(a, b)
    }
}
