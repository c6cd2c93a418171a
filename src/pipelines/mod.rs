//! Search pipelines.
//!
//! - `search`: exhaustive query-vs-database scan with Top-K ranking

pub mod search;
