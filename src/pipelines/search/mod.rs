//! Exhaustive database search.
//!
//! - `query`: channel layout for strands and reading frames
//! - `database`: sequence access and chunking
//! - `orchestrator`: parallel scan, Top-K reduction and alignment listing

pub mod database;
pub mod orchestrator;
pub mod query;

pub use database::{InMemoryDatabase, SequenceDatabase};
pub use orchestrator::{AlignedHit, SearchResult, Searcher};
pub use query::{QueryChannel, QueryPacking, Strand, StrandSelection, SymbolType};
