//! Query channels and packing.
//!
//! A search compares every database sequence against up to six query
//! channels at once. Which channels exist depends on the symbol translation
//! mode and the strands selected:
//!
//! | symbol type                        | channels                           |
//! |------------------------------------|------------------------------------|
//! | nucleotide                         | forward and/or reverse complement  |
//! | amino acid, translated db          | the query as given                 |
//! | translated query, translated both  | 3 frames per selected strand       |
//!
//! Channel index `frame + 3 * strand` for translated queries; hits report the
//! channel position as their `query_id`.

use std::fmt;
use std::str::FromStr;

use crate::alphabet::reverse_complement;
use crate::defaults::MAX_QUERY_CHANNELS;
use crate::error::{Result, SsaError};

/// How query and database symbols relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolType {
    /// Nucleotide query against nucleotide database
    Nucleotide,
    /// Protein query against protein database
    AminoAcid,
    /// Nucleotide query translated in three frames per strand
    TranslatedQuery,
    /// Protein query against a database the caller translates
    TranslatedDb,
    /// Both sides translated; the query side is packed like `TranslatedQuery`
    TranslatedBoth,
}

impl SymbolType {
    /// Query channels are produced by translating the nucleotide query.
    pub fn translates_query(self) -> bool {
        matches!(self, SymbolType::TranslatedQuery | SymbolType::TranslatedBoth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrandSelection {
    Forward,
    Complementary,
    Both,
}

impl StrandSelection {
    fn strands(self) -> &'static [Strand] {
        match self {
            StrandSelection::Forward => &[Strand::Forward],
            StrandSelection::Complementary => &[Strand::Reverse],
            StrandSelection::Both => &[Strand::Forward, Strand::Reverse],
        }
    }
}

impl FromStr for StrandSelection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "plus" => Ok(StrandSelection::Forward),
            "complementary" | "reverse" | "minus" => Ok(StrandSelection::Complementary),
            "both" => Ok(StrandSelection::Both),
            other => Err(format!("unknown strand selection '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Forward = 0,
    Reverse = 1,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => f.write_str("+"),
            Strand::Reverse => f.write_str("-"),
        }
    }
}

/// One query sequence as searched, with its reading frame and strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryChannel {
    pub sequence: Vec<u8>,
    /// Reading frame, 0..3 (always 0 for untranslated channels)
    pub frame: u8,
    pub strand: Strand,
}

impl QueryChannel {
    pub fn new(sequence: Vec<u8>, frame: u8, strand: Strand) -> Self {
        Self {
            sequence,
            frame,
            strand,
        }
    }

    pub fn forward(sequence: Vec<u8>) -> Self {
        Self::new(sequence, 0, Strand::Forward)
    }
}

/// The 1 to 6 channels searched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPacking {
    channels: Vec<QueryChannel>,
}

impl QueryPacking {
    /// Check channel count, frames and (frame, strand) uniqueness.
    pub fn new(channels: Vec<QueryChannel>) -> Result<Self> {
        if channels.is_empty() || channels.len() > MAX_QUERY_CHANNELS {
            log::error!("query packing with {} channels", channels.len());
            return Err(SsaError::InvalidChannelCount(channels.len()));
        }
        for (i, ch) in channels.iter().enumerate() {
            if ch.frame > 2 {
                return Err(SsaError::InvalidQueryPacking(format!(
                    "channel {i} has frame {}, expected 0..=2",
                    ch.frame
                )));
            }
            if channels[..i]
                .iter()
                .any(|other| other.frame == ch.frame && other.strand == ch.strand)
            {
                return Err(SsaError::InvalidQueryPacking(format!(
                    "channel {i} repeats frame {} on strand {}",
                    ch.frame, ch.strand
                )));
            }
        }
        Ok(Self { channels })
    }

    /// One forward channel.
    pub fn single(sequence: Vec<u8>) -> Self {
        Self {
            channels: vec![QueryChannel::forward(sequence)],
        }
    }

    /// Build the channel layout for `symbol_type` and `strands`.
    ///
    /// `query` holds nucleotide codes when the query is translated or
    /// nucleotide, and amino acid codes otherwise. `translate(strand_seq,
    /// frame)` maps one strand of the nucleotide query to amino acid codes for
    /// a reading frame; it is only called for translated queries.
    pub fn from_layout<F>(
        query: &[u8],
        symbol_type: SymbolType,
        strands: StrandSelection,
        mut translate: F,
    ) -> Result<Self>
    where
        F: FnMut(&[u8], u8) -> Vec<u8>,
    {
        let mut channels = Vec::with_capacity(MAX_QUERY_CHANNELS);
        match symbol_type {
            SymbolType::Nucleotide => {
                for &strand in strands.strands() {
                    channels.push(QueryChannel::new(strand_sequence(query, strand), 0, strand));
                }
            }
            SymbolType::AminoAcid | SymbolType::TranslatedDb => {
                channels.push(QueryChannel::forward(query.to_vec()));
            }
            SymbolType::TranslatedQuery | SymbolType::TranslatedBoth => {
                for &strand in strands.strands() {
                    let nt = strand_sequence(query, strand);
                    for frame in 0..3u8 {
                        channels.push(QueryChannel::new(translate(&nt, frame), frame, strand));
                    }
                }
            }
        }
        log::debug!(
            "packed {} query channels ({symbol_type:?}, {strands:?})",
            channels.len()
        );
        Self::new(channels)
    }

    pub fn channels(&self) -> &[QueryChannel] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel(&self, query_id: usize) -> Option<&QueryChannel> {
        self.channels.get(query_id)
    }
}

fn strand_sequence(query: &[u8], strand: Strand) -> Vec<u8> {
    match strand {
        Strand::Forward => query.to_vec(),
        Strand::Reverse => reverse_complement(query),
    }
}
