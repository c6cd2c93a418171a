//! Core alignment engines.
//!
//! Score engines for the inter-sequence search (profile builder, vector
//! recurrence, scalar reference, escalation) and the scalar traceback that
//! turns a reported hit into a CIGAR.

pub mod cigar;
pub mod dispatch; // Engine selection per (precision, capability)
pub mod escalation;
pub mod kernel;
pub mod lanes;
pub mod matrix;
pub mod profile;
pub mod scalar;
pub mod traceback;
pub mod types;
pub mod workspace; // Thread-local buffer pools for allocation reuse
