//! 256‑bit SIMD engine (AVX2)
//!
//! This module provides the AVX2 implementation of the `SimdEngine` trait on
//! x86_64. It offers 32 lanes for 8‑bit scores and 16 lanes for 16‑bit
//! scores, mapping directly to `_mm256_*` intrinsics.
//!
//! All functions are `unsafe` and additionally annotated with
//! `#[target_feature(enable = "avx2")]`. Callers must ensure AVX2 is
//! available (the search dispatcher does this for you).
//!
//! Compared to the 128‑bit engine, the kernel processes twice as many
//! database sequences per vector, so throughput on long databases roughly
//! doubles.

use std::arch::x86_64::*;

use super::SimdEngine;

/// 256-bit SIMD engine (AVX2 on x86_64)
///
/// Provides 32-way parallelism for 8-bit scores and 16-way for 16-bit scores.
/// Requires AVX2 CPU support (Intel Haswell 2013+ or AMD Excavator 2015+).
#[derive(Clone, Copy)]
pub struct SimdEngine256;

#[allow(unsafe_op_in_unsafe_fn)]
impl SimdEngine for SimdEngine256 {
    const WIDTH_8: usize = 32; // 256 bits ÷ 8 bits = 32 lanes
    const WIDTH_16: usize = 16; // 256 bits ÷ 16 bits = 16 lanes

    type Vec8 = __m256i;
    type Vec16 = __m256i;

    // ===== 8-bit lanes =====

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn set1_epi8(a: i8) -> Self::Vec8 {
        _mm256_set1_epi8(a)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn loadu_epi8(p: *const i8) -> Self::Vec8 {
        _mm256_loadu_si256(p as *const __m256i)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn storeu_epi8(p: *mut i8, a: Self::Vec8) {
        _mm256_storeu_si256(p as *mut __m256i, a)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn adds_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm256_adds_epi8(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn subs_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm256_subs_epi8(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn max_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm256_max_epi8(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn min_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        _mm256_min_epi8(a, b)
    }

    // ===== 16-bit lanes =====

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn set1_epi16(a: i16) -> Self::Vec16 {
        _mm256_set1_epi16(a)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn loadu_epi16(p: *const i16) -> Self::Vec16 {
        _mm256_loadu_si256(p as *const __m256i)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn storeu_epi16(p: *mut i16, a: Self::Vec16) {
        _mm256_storeu_si256(p as *mut __m256i, a)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn adds_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm256_adds_epi16(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn subs_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm256_subs_epi16(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn max_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm256_max_epi16(a, b)
    }

    #[inline]
    #[target_feature(enable = "avx2")]
    unsafe fn min_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        _mm256_min_epi16(a, b)
    }
}
