//! Search orchestration.
//!
//! `Searcher` scans a database with a packed query:
//!
//! 1. The database id space is cut into chunks of `chunk_size` sequences.
//! 2. Rayon workers take chunks independently. For every query channel the
//!    chunk goes through the escalation chain (8 -> 16 -> 64 bits) using the
//!    worker's thread-local scratch, and every resolved score is offered to
//!    the worker's Top-K collector.
//! 3. Worker collectors and escalation counters are merged in a reduction.
//!    The ranking is a total order, so the merged result does not depend on
//!    chunk scheduling.
//!
//! `align` re-runs the reported hits through the scalar traceback to attach
//! CIGARs.

use std::ops::Range;

use rayon::prelude::*;

use super::database::SequenceDatabase;
use super::query::QueryPacking;
use crate::config::{SearchConfig, SearchType};
use crate::core::alignment::escalation::{EscalationStats, resolve_scores};
use crate::core::alignment::traceback::{Alignment, align_pair};
use crate::core::alignment::types::AlignParams;
use crate::core::alignment::workspace::with_workspace;
use crate::core::compute::simd_abstraction::{SimdCapability, effective_capability};
use crate::core::topk::{Hit, TopK};
use crate::error::{Result, SsaError};

/// Ranked hits plus escalation counters for one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best hits first
    pub hits: Vec<Hit>,
    /// Sequences that saturated 8-bit lanes and were rescored at 16 bits
    pub overflow_8_bit_count: usize,
    /// Sequences that saturated 16-bit lanes and were rescored at 64 bits
    pub overflow_16_bit_count: usize,
    /// Database sequences scanned (each against every channel)
    pub sequences_searched: usize,
}

/// A hit with its traced alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedHit {
    pub hit: Hit,
    pub alignment: Alignment,
}

/// Per-worker partial result.
struct Partial {
    topk: TopK,
    stats: EscalationStats,
}

impl Partial {
    fn new(capacity: usize) -> Self {
        Self {
            topk: TopK::new(capacity),
            stats: EscalationStats::default(),
        }
    }

    fn merge(mut self, other: Partial) -> Partial {
        self.stats.merge(other.stats);
        Partial {
            topk: self.topk.merge(other.topk),
            stats: self.stats,
        }
    }
}

pub struct Searcher {
    config: SearchConfig,
    capability: SimdCapability,
    pool: Option<rayon::ThreadPool>,
}

impl Searcher {
    /// Validate `config`, pick the SIMD tier and set up the worker pool.
    pub fn new(config: SearchConfig) -> Result<Self> {
        if let Err(e) = config.validate() {
            log::error!("{e}");
            return Err(e);
        }
        let capability = effective_capability(config.max_capability);
        log::debug!(
            "{} search using {} ({} x i8, {} x i16 lanes)",
            config.search_type,
            capability.description(),
            capability.lanes_8(),
            capability.lanes_16()
        );

        let pool = match config.threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
                log::debug!("built search pool with {n} threads");
                Some(pool)
            }
            None => None,
        };

        Ok(Self {
            config,
            capability,
            pool,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// SIMD tier the kernels run on.
    pub fn capability(&self) -> SimdCapability {
        self.capability
    }

    /// Score every database sequence against every query channel and keep
    /// the best `hit_count` (db, channel) pairs.
    pub fn search<D>(&self, queries: &QueryPacking, db: &D) -> Result<SearchResult>
    where
        D: SequenceDatabase + ?Sized,
    {
        for channel in queries.channels() {
            if let Err(e) = self.config.matrix.check_symbols(&channel.sequence) {
                log::error!("query channel (frame {}, strand {}): {e}", channel.frame, channel.strand);
                return Err(e);
            }
        }

        let ranges = db.chunk_ranges(self.config.chunk_size);
        log::debug!(
            "searching {} sequences in {} chunks with {} query channels",
            db.len(),
            ranges.len(),
            queries.len()
        );

        let k = self.config.hit_count;
        let scan = || {
            ranges
                .par_iter()
                .map(|range| self.scan_chunk(queries, db, range.clone()))
                .try_reduce(|| Partial::new(k), |a, b| Ok(a.merge(b)))
        };
        let partial = match &self.pool {
            Some(pool) => pool.install(scan)?,
            None => scan()?,
        };

        log::debug!(
            "search done: {} hits, {} 8-bit overflows, {} 16-bit overflows",
            partial.topk.len(),
            partial.stats.overflow_8_bit,
            partial.stats.overflow_16_bit
        );

        Ok(SearchResult {
            hits: partial.topk.into_sorted(),
            overflow_8_bit_count: partial.stats.overflow_8_bit,
            overflow_16_bit_count: partial.stats.overflow_16_bit,
            sequences_searched: db.len(),
        })
    }

    fn scan_chunk<D>(&self, queries: &QueryPacking, db: &D, range: Range<usize>) -> Result<Partial>
    where
        D: SequenceDatabase + ?Sized,
    {
        let matrix = self.config.matrix.as_ref();
        let seqs = range.clone().map(|id| db.require(id)).collect::<Result<Vec<&[u8]>>>()?;

        let mut partial = Partial::new(self.config.hit_count);
        let Partial { topk, stats } = &mut partial;
        with_workspace(|ws| {
            ws.chunks_scored += 1;
            for (query_id, channel) in queries.channels().iter().enumerate() {
                let params = AlignParams::new(
                    self.config.search_type,
                    &channel.sequence,
                    matrix,
                    self.config.gaps,
                );
                resolve_scores(
                    self.capability,
                    self.config.start_width,
                    &params,
                    &seqs,
                    &mut ws.escalation,
                    stats,
                    |idx, score| {
                        topk.add(Hit::new(range.start + idx, query_id, score));
                    },
                )
                .inspect_err(|e| log::error!("database chunk {range:?}: {e}"))?;
            }
            Ok::<_, SsaError>(())
        })?;
        log::trace!("chunk {range:?} scanned, weakest kept hit {:?}", topk.min());
        Ok(partial)
    }

    /// Trace `hits` against their database sequences.
    ///
    /// Fails with `UnsupportedSearchType` for the Sellers variant.
    pub fn align<D>(&self, queries: &QueryPacking, db: &D, hits: &[Hit]) -> Result<Vec<AlignedHit>>
    where
        D: SequenceDatabase + ?Sized,
    {
        let search_type = self.config.search_type;
        if search_type == SearchType::NeedlemanWunschSellers {
            log::error!("alignment listing requested for {search_type}");
            return Err(SsaError::UnsupportedSearchType(search_type));
        }

        let trace = || {
            hits.par_iter()
                .map(|&hit| {
                    let channel = queries.channel(hit.query_id).ok_or_else(|| {
                        SsaError::InvalidQueryPacking(format!("hit refers to missing channel {}", hit.query_id))
                    })?;
                    let params = AlignParams::new(
                        search_type,
                        &channel.sequence,
                        self.config.matrix.as_ref(),
                        self.config.gaps,
                    );
                    let alignment = align_pair(&params, db.require(hit.db_id)?)?;
                    debug_assert_eq!(alignment.score, hit.score);
                    Ok(AlignedHit { hit, alignment })
                })
                .collect::<Result<Vec<_>>>()
        };
        match &self.pool {
            Some(pool) => pool.install(trace),
            None => trace(),
        }
    }

    /// `search` followed by `align` over the reported hits.
    pub fn search_and_align<D>(&self, queries: &QueryPacking, db: &D) -> Result<(SearchResult, Vec<AlignedHit>)>
    where
        D: SequenceDatabase + ?Sized,
    {
        let result = self.search(queries, db)?;
        let aligned = self.align(queries, db, &result.hits)?;
        Ok((result, aligned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::core::alignment::matrix::ScoreMatrix;
    use crate::pipelines::search::database::InMemoryDatabase;

    fn dna(s: &str) -> Vec<u8> {
        Alphabet::Nucleotide.encode(s.as_bytes())
    }

    fn sw_config() -> SearchConfig {
        SearchConfig::new(SearchType::SmithWaterman, ScoreMatrix::constant(5, 1, -1)).with_gaps(0, 1)
    }

    #[test]
    fn test_search_ranks_hits() {
        let db = InMemoryDatabase::from_sequences(vec![dna("AATG"), dna("CCCC"), dna("ATGCCCAA")]);
        let searcher = Searcher::new(sw_config().with_hit_count(2)).unwrap();
        let result = searcher.search(&QueryPacking::single(dna("ATGCAAA")), &db).unwrap();
        assert_eq!(result.hits, vec![Hit::new(2, 0, 4), Hit::new(0, 0, 3)]);
        assert_eq!(result.sequences_searched, 3);
        assert_eq!(result.overflow_8_bit_count, 0);
    }

    #[test]
    fn test_search_with_private_pool_and_small_chunks() {
        let seqs: Vec<Vec<u8>> = (0..25).map(|i| dna(&"ACGT".repeat(1 + i % 5))).collect();
        let db = InMemoryDatabase::from_sequences(seqs);
        let query = QueryPacking::single(dna("ACGTACGT"));
        let pooled = Searcher::new(sw_config().with_threads(3).with_chunk_size(4)).unwrap();
        let global = Searcher::new(sw_config()).unwrap();
        assert_eq!(
            pooled.search(&query, &db).unwrap().hits,
            global.search(&query, &db).unwrap().hits
        );
    }

    #[test]
    fn test_invalid_symbols_rejected() {
        let searcher = Searcher::new(sw_config()).unwrap();
        let db = InMemoryDatabase::from_sequences(vec![vec![0, 9]]);
        let err = searcher.search(&QueryPacking::single(dna("ACGT")), &db).unwrap_err();
        assert!(matches!(err, SsaError::InvalidSymbol { symbol: 9, alphabet: 5 }));

        let ok_db = InMemoryDatabase::from_sequences(vec![dna("ACGT")]);
        let err = searcher.search(&QueryPacking::single(vec![7]), &ok_db).unwrap_err();
        assert!(matches!(err, SsaError::InvalidSymbol { symbol: 7, .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Searcher::new(sw_config().with_hit_count(0)),
            Err(SsaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_align_attaches_cigars() {
        let db = InMemoryDatabase::from_sequences(vec![dna("AATG")]);
        let query = QueryPacking::single(dna("AT"));
        let searcher = Searcher::new(sw_config()).unwrap();
        let (result, aligned) = searcher.search_and_align(&query, &db).unwrap();
        assert_eq!(result.hits, vec![Hit::new(0, 0, 2)]);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].alignment.cigar.to_string(), "2M");
        assert_eq!(aligned[0].alignment.db_range, 1..3);
    }

    #[test]
    fn test_align_rejects_sellers() {
        let config = SearchConfig::new(SearchType::NeedlemanWunschSellers, ScoreMatrix::constant(5, 1, -1));
        let searcher = Searcher::new(config).unwrap();
        let db = InMemoryDatabase::from_sequences(vec![dna("ACGT")]);
        let query = QueryPacking::single(dna("CG"));
        let result = searcher.search(&query, &db).unwrap();
        assert_eq!(result.hits, vec![Hit::new(0, 0, 2)]);
        assert!(matches!(
            searcher.align(&query, &db, &result.hits),
            Err(SsaError::UnsupportedSearchType(SearchType::NeedlemanWunschSellers))
        ));
    }
}
