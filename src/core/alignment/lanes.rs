//! Kernel-facing lane abstraction.
//!
//! The recurrence in `kernel.rs` is written once against `ScoreLanes`. The
//! adapters here bind it to a concrete `SimdEngine` and element width, so
//! `Lanes8<SimdEngine256>` is the 32 x i8 AVX2 kernel and
//! `Lanes16<SimdEnginePortable>` the 8 x i16 array kernel.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::core::compute::simd_abstraction::SimdEngine;

/// Integer element stored in a lane.
pub trait ScoreElem: Copy + Ord + Default + Debug + Send + Sync + 'static {
    const MIN: Self;
    const MAX: Self;

    fn from_i64_saturating(v: i64) -> Self;
    fn to_i64(self) -> i64;

    /// `v` is representable exactly.
    #[inline]
    fn fits(v: i64) -> bool {
        v >= Self::MIN.to_i64() && v <= Self::MAX.to_i64()
    }

    /// `v` is representable and cannot be confused with a saturated value.
    #[inline]
    fn fits_strict(v: i64) -> bool {
        v > Self::MIN.to_i64() && v < Self::MAX.to_i64()
    }
}

macro_rules! impl_score_elem {
    ($t:ty) => {
        impl ScoreElem for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline(always)]
            fn from_i64_saturating(v: i64) -> Self {
                v.clamp(<$t>::MIN as i64, <$t>::MAX as i64) as $t
            }

            #[inline(always)]
            fn to_i64(self) -> i64 {
                self as i64
            }
        }
    };
}

impl_score_elem!(i8);
impl_score_elem!(i16);

/// Saturating lane operations the recurrence is written against.
///
/// Safety: every method has the same requirements as the underlying
/// `SimdEngine` call (CPU feature present, pointers valid for `LANES` elements).
pub trait ScoreLanes {
    type Elem: ScoreElem;
    type V: Copy;
    const LANES: usize;

    unsafe fn splat(x: Self::Elem) -> Self::V;
    unsafe fn load(p: *const Self::Elem) -> Self::V;
    unsafe fn store(p: *mut Self::Elem, v: Self::V);
    unsafe fn adds(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn subs(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn max(a: Self::V, b: Self::V) -> Self::V;
    unsafe fn min(a: Self::V, b: Self::V) -> Self::V;
}

/// 8-bit lanes of engine `E`.
pub struct Lanes8<E>(PhantomData<E>);

/// 16-bit lanes of engine `E`.
pub struct Lanes16<E>(PhantomData<E>);

impl<E: SimdEngine> ScoreLanes for Lanes8<E> {
    type Elem = i8;
    type V = E::Vec8;
    const LANES: usize = E::WIDTH_8;

    #[inline(always)]
    unsafe fn splat(x: i8) -> Self::V {
        unsafe { E::set1_epi8(x) }
    }
    #[inline(always)]
    unsafe fn load(p: *const i8) -> Self::V {
        unsafe { E::loadu_epi8(p) }
    }
    #[inline(always)]
    unsafe fn store(p: *mut i8, v: Self::V) {
        unsafe { E::storeu_epi8(p, v) }
    }
    #[inline(always)]
    unsafe fn adds(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::adds_epi8(a, b) }
    }
    #[inline(always)]
    unsafe fn subs(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::subs_epi8(a, b) }
    }
    #[inline(always)]
    unsafe fn max(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::max_epi8(a, b) }
    }
    #[inline(always)]
    unsafe fn min(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::min_epi8(a, b) }
    }
}

impl<E: SimdEngine> ScoreLanes for Lanes16<E> {
    type Elem = i16;
    type V = E::Vec16;
    const LANES: usize = E::WIDTH_16;

    #[inline(always)]
    unsafe fn splat(x: i16) -> Self::V {
        unsafe { E::set1_epi16(x) }
    }
    #[inline(always)]
    unsafe fn load(p: *const i16) -> Self::V {
        unsafe { E::loadu_epi16(p) }
    }
    #[inline(always)]
    unsafe fn store(p: *mut i16, v: Self::V) {
        unsafe { E::storeu_epi16(p, v) }
    }
    #[inline(always)]
    unsafe fn adds(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::adds_epi16(a, b) }
    }
    #[inline(always)]
    unsafe fn subs(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::subs_epi16(a, b) }
    }
    #[inline(always)]
    unsafe fn max(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::max_epi16(a, b) }
    }
    #[inline(always)]
    unsafe fn min(a: Self::V, b: Self::V) -> Self::V {
        unsafe { E::min_epi16(a, b) }
    }
}
