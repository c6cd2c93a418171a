//! Hardware abstraction for the score engines.

pub mod simd_abstraction;
