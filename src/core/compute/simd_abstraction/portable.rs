//! Portable array engine
//!
//! Plain fixed-size arrays standing in for 128‑bit registers. Every operation
//! is a per-lane loop over the std saturating integer methods, which LLVM will
//! happily auto-vectorise where the target allows it. This is the engine used
//! on non-x86 targets and whenever a search is capped to
//! `SimdCapability::Portable`; it also serves as the reference behaviour for
//! the intrinsic engines in the tests.

use super::SimdEngine;

/// Array-backed engine with the same lane counts as `SimdEngine128`.
#[derive(Clone, Copy)]
pub struct SimdEnginePortable;

#[inline(always)]
fn zip8(a: [i8; 16], b: [i8; 16], f: impl Fn(i8, i8) -> i8) -> [i8; 16] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

#[inline(always)]
fn zip16(a: [i16; 8], b: [i16; 8], f: impl Fn(i16, i16) -> i16) -> [i16; 8] {
    std::array::from_fn(|i| f(a[i], b[i]))
}

impl SimdEngine for SimdEnginePortable {
    const WIDTH_8: usize = 16;
    const WIDTH_16: usize = 8;

    type Vec8 = [i8; 16];
    type Vec16 = [i16; 8];

    #[inline]
    unsafe fn set1_epi8(a: i8) -> Self::Vec8 {
        [a; 16]
    }

    #[inline]
    unsafe fn loadu_epi8(p: *const i8) -> Self::Vec8 {
        unsafe { std::ptr::read_unaligned(p as *const [i8; 16]) }
    }

    #[inline]
    unsafe fn storeu_epi8(p: *mut i8, a: Self::Vec8) {
        unsafe { std::ptr::write_unaligned(p as *mut [i8; 16], a) }
    }

    #[inline]
    unsafe fn adds_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        zip8(a, b, i8::saturating_add)
    }

    #[inline]
    unsafe fn subs_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        zip8(a, b, i8::saturating_sub)
    }

    #[inline]
    unsafe fn max_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        zip8(a, b, Ord::max)
    }

    #[inline]
    unsafe fn min_epi8(a: Self::Vec8, b: Self::Vec8) -> Self::Vec8 {
        zip8(a, b, Ord::min)
    }

    #[inline]
    unsafe fn set1_epi16(a: i16) -> Self::Vec16 {
        [a; 8]
    }

    #[inline]
    unsafe fn loadu_epi16(p: *const i16) -> Self::Vec16 {
        unsafe { std::ptr::read_unaligned(p as *const [i16; 8]) }
    }

    #[inline]
    unsafe fn storeu_epi16(p: *mut i16, a: Self::Vec16) {
        unsafe { std::ptr::write_unaligned(p as *mut [i16; 8], a) }
    }

    #[inline]
    unsafe fn adds_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        zip16(a, b, i16::saturating_add)
    }

    #[inline]
    unsafe fn subs_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        zip16(a, b, i16::saturating_sub)
    }

    #[inline]
    unsafe fn max_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        zip16(a, b, Ord::max)
    }

    #[inline]
    unsafe fn min_epi16(a: Self::Vec16, b: Self::Vec16) -> Self::Vec16 {
        zip16(a, b, Ord::min)
    }
}
