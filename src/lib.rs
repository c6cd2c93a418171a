pub mod alphabet;
pub mod config;
pub mod core;
pub mod defaults;
pub mod error;
pub mod io; // FASTA input using bio::io::fasta (used by the binary)
pub mod pipelines;

pub use config::{BitWidth, GapCosts, SearchConfig, SearchType};
pub use crate::core::alignment::cigar::{Cigar, CigarOp};
pub use crate::core::alignment::matrix::ScoreMatrix;
pub use crate::core::alignment::traceback::Alignment;
pub use crate::core::compute::simd_abstraction::SimdCapability;
pub use crate::core::topk::{Hit, TopK};
pub use error::{Result, SsaError};
pub use pipelines::search::{
    AlignedHit, InMemoryDatabase, QueryChannel, QueryPacking, SearchResult, Searcher, SequenceDatabase,
};
