//! Core reusable components for sequence search.
//!
//! These pieces know nothing about where sequences come from or how queries
//! are packed; the search pipeline in `pipelines::search` drives them.

pub mod alignment;
pub mod compute;
pub mod topk;
