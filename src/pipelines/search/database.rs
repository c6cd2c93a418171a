//! Database access for the search pipeline.
//!
//! The search only needs random access to encoded sequences by id and a way
//! to cut the id space into chunks; where the sequences come from is up to
//! the implementor.

use std::ops::Range;

use crate::error::{Result, SsaError};

/// Read-only sequence store shared by all search workers.
pub trait SequenceDatabase: Sync {
    /// Number of sequences.
    fn len(&self) -> usize;

    /// Encoded sequence `id`, or `None` past the end.
    fn sequence(&self, id: usize) -> Option<&[u8]>;

    /// Display name of sequence `id`.
    fn header(&self, id: usize) -> Option<&str> {
        let _ = id;
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Contiguous id ranges of at most `chunk_size` sequences.
    fn chunk_ranges(&self, chunk_size: usize) -> Vec<Range<usize>> {
        let size = chunk_size.max(1);
        (0..self.len())
            .step_by(size)
            .map(|start| start..(start + size).min(self.len()))
            .collect()
    }

    /// Like `sequence`, with an error for unknown ids.
    fn require(&self, id: usize) -> Result<&[u8]> {
        self.sequence(id).ok_or(SsaError::UnknownSequence(id))
    }
}

/// Database held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    headers: Vec<String>,
    sequences: Vec<Vec<u8>>,
    residues: usize,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequences named by their position.
    pub fn from_sequences(sequences: Vec<Vec<u8>>) -> Self {
        let mut db = Self::new();
        for (i, seq) in sequences.into_iter().enumerate() {
            db.push(format!("seq{i}"), seq);
        }
        db
    }

    /// Append a sequence and return its id.
    pub fn push(&mut self, header: impl Into<String>, sequence: Vec<u8>) -> usize {
        self.residues += sequence.len();
        self.headers.push(header.into());
        self.sequences.push(sequence);
        self.sequences.len() - 1
    }

    /// Total number of symbols over all sequences.
    pub fn residues(&self) -> usize {
        self.residues
    }

    pub fn longest(&self) -> usize {
        self.sequences.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl SequenceDatabase for InMemoryDatabase {
    fn len(&self) -> usize {
        self.sequences.len()
    }

    fn sequence(&self, id: usize) -> Option<&[u8]> {
        self.sequences.get(id).map(Vec::as_slice)
    }

    fn header(&self, id: usize) -> Option<&str> {
        self.headers.get(id).map(String::as_str)
    }
}
