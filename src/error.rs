//! Library error type.
//!
//! Numeric saturation is never an error; it is absorbed by precision
//! escalation. Everything here is a caller or configuration mistake.

use thiserror::Error;

use crate::config::SearchType;

/// Errors raised by search and alignment entry points
#[derive(Debug, Error)]
pub enum SsaError {
    #[error("traceback is not supported for {0}")]
    UnsupportedSearchType(SearchType),

    #[error("a query packing needs 1 to 6 channels, got {0}")]
    InvalidChannelCount(usize),

    #[error("invalid query channel: {0}")]
    InvalidQueryPacking(String),

    #[error("symbol code {symbol} is outside the {alphabet}-symbol alphabet")]
    InvalidSymbol { symbol: u8, alphabet: usize },

    #[error("invalid scoring: {0}")]
    InvalidScoring(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no database sequence with id {0}")]
    UnknownSequence(usize),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, SsaError>;
