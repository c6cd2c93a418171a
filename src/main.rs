use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ferrous_ssa::alphabet::Alphabet;
use ferrous_ssa::io::fasta_reader::FastaReader;
use ferrous_ssa::pipelines::search::{QueryPacking, SequenceDatabase, Strand, StrandSelection, SymbolType};
use ferrous_ssa::{BitWidth, ScoreMatrix, SearchConfig, SearchType, Searcher, SimdCapability, defaults};

#[derive(Parser)]
#[command(name = "ferrous-ssa")]
#[command(about = "FerrousSSA - SIMD optimal alignment search (Smith-Waterman, Needleman-Wunsch, Sellers)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a sequence database with one or more query sequences
    Search {
        /// Query FASTA file; every record is searched separately
        #[arg(short = 'q', long, value_name = "QUERY.FA")]
        query: PathBuf,

        /// Database FASTA file (.fa or .fa.gz)
        #[arg(short = 'd', long, value_name = "DB.FA")]
        db: PathBuf,

        // ===== Algorithm Options =====
        /// Alignment type: sw, nw or sellers
        #[arg(short = 'a', long, value_name = "TYPE", default_value = "sw")]
        algorithm: SearchType,

        /// Number of hits to report per query
        #[arg(short = 'n', long, value_name = "INT", default_value_t = defaults::HIT_COUNT)]
        hits: usize,

        /// Accumulator width to start at: 8, 16 or 64
        #[arg(short = 'b', long, value_name = "BITS", default_value = "8")]
        bit_width: BitWidth,

        /// Widest SIMD tier to use: portable, sse41 or avx2
        #[arg(long, value_name = "TIER", default_value = "avx2")]
        simd: SimdCapability,

        // ===== Scoring Options =====
        /// Score for a match
        #[arg(short = 'A', long = "match", value_name = "INT", default_value_t = defaults::MATCH_SCORE)]
        match_score: i32,

        /// Score for a mismatch (usually negative)
        #[arg(short = 'B', long = "mismatch", value_name = "INT", default_value_t = defaults::MISMATCH_SCORE, allow_negative_numbers = true)]
        mismatch_score: i32,

        /// Gap open cost; a gap of size k costs '{-O} + {-E}*k'
        #[arg(short = 'O', long, value_name = "INT", default_value_t = defaults::GAP_OPEN)]
        gap_open: i32,

        /// Gap extension cost
        #[arg(short = 'E', long, value_name = "INT", default_value_t = defaults::GAP_EXTEND)]
        gap_extend: i32,

        // ===== Sequence Options =====
        /// Strands of a nucleotide query to search: forward, complementary or both
        #[arg(short = 's', long, value_name = "STRANDS", default_value = "forward")]
        strands: StrandSelection,

        /// Treat query and database as amino acid sequences
        #[arg(short = 'p', long)]
        protein: bool,

        // ===== Output Options =====
        /// Report scores only, without tracing alignments
        #[arg(long)]
        no_cigar: bool,

        /// Verbose logging (-v debug, -vv trace)
        #[arg(short = 'v', long, action = clap::ArgAction::Count)]
        verbose: u8,

        // ===== Processing Options =====
        /// Number of threads (default: all available cores)
        #[arg(short = 't', long, value_name = "INT")]
        threads: Option<usize>,

        /// Database sequences per work unit
        #[arg(short = 'K', long, value_name = "INT", default_value_t = defaults::CHUNK_SIZE)]
        chunk_size: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            query,
            db,
            algorithm,
            hits,
            bit_width,
            simd,
            match_score,
            mismatch_score,
            gap_open,
            gap_extend,
            strands,
            protein,
            no_cigar,
            verbose,
            threads,
            chunk_size,
        } => {
            let log_level = match verbose {
                0 => log::LevelFilter::Info,
                1 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            };
            env_logger::Builder::from_default_env()
                .filter_level(log_level)
                .format_timestamp(None) // Don't show timestamps
                .format_target(false) // Don't show module names
                .init();

            // Default to number of CPU cores if not specified
            let mut num_threads = threads.unwrap_or_else(num_cpus::get);
            if num_threads < 1 {
                log::warn!("Invalid thread count {num_threads}, using 1 thread");
                num_threads = 1;
            }
            let max_threads = num_cpus::get() * 2;
            if num_threads > max_threads {
                log::warn!("Thread count {num_threads} exceeds recommended maximum {max_threads}, capping");
                num_threads = max_threads;
            }

            let alphabet = if protein {
                Alphabet::AminoAcid
            } else {
                Alphabet::Nucleotide
            };
            let symbol_type = if protein {
                SymbolType::AminoAcid
            } else {
                SymbolType::Nucleotide
            };

            let config = SearchConfig::new(algorithm, ScoreMatrix::constant(alphabet.dim(), match_score, mismatch_score))
                .with_gaps(gap_open, gap_extend)
                .with_hit_count(hits)
                .with_start_width(bit_width)
                .with_max_capability(simd)
                .with_chunk_size(chunk_size)
                .with_threads(num_threads);
            let searcher = Searcher::new(config).context("invalid search configuration")?;

            log::info!("{algorithm} search, {} query vs {}", query.display(), db.display());
            log::info!("Scoring: match {match_score}, mismatch {mismatch_score}, gap open {gap_open}, gap extend {gap_extend}");
            log::info!("Using {} ({num_threads} threads)", searcher.capability().description());

            let database = FastaReader::new(&db)
                .and_then(|mut reader| reader.read_database(alphabet))
                .with_context(|| format!("failed to read database {}", db.display()))?;
            if database.is_empty() {
                bail!("database {} contains no sequences", db.display());
            }
            log::info!("Database: {} sequences, {} residues", database.len(), database.residues());

            let mut reader =
                FastaReader::new(&query).with_context(|| format!("failed to open query file {}", query.display()))?;
            let mut searched = 0usize;
            while let Some(record) = reader
                .read_record()
                .with_context(|| format!("failed to parse query file {}", query.display()))?
            {
                let packing =
                    QueryPacking::from_layout(&alphabet.encode(record.seq()), symbol_type, strands, |_, _| Vec::new())?;
                let result = searcher.search(&packing, &database)?;

                println!("# query {} ({} symbols)", record.id(), record.seq().len());
                if result.overflow_8_bit_count + result.overflow_16_bit_count > 0 {
                    log::info!(
                        "{}: {} sequences rescored at 16 bits, {} at 64 bits",
                        record.id(),
                        result.overflow_8_bit_count,
                        result.overflow_16_bit_count
                    );
                }

                let cigars = if no_cigar || algorithm == SearchType::NeedlemanWunschSellers {
                    if !no_cigar {
                        log::warn!("{algorithm} has no traceback, reporting scores only");
                    }
                    vec![None; result.hits.len()]
                } else {
                    searcher
                        .align(&packing, &database, &result.hits)?
                        .into_iter()
                        .map(|aligned| Some(aligned.alignment))
                        .collect()
                };

                for (rank, (hit, alignment)) in result.hits.iter().zip(cigars).enumerate() {
                    let name = database.header(hit.db_id).unwrap_or("?");
                    let strand = packing.channel(hit.query_id).map_or(Strand::Forward, |c| c.strand);
                    match alignment {
                        Some(aln) => println!(
                            "{}\t{name}\t{strand}\t{}\t{}-{}\t{}-{}\t{}",
                            rank + 1,
                            hit.score,
                            aln.query_range.start + 1,
                            aln.query_range.end,
                            aln.db_range.start + 1,
                            aln.db_range.end,
                            aln.cigar
                        ),
                        None => println!("{}\t{name}\t{strand}\t{}", rank + 1, hit.score),
                    }
                }
                searched += 1;
            }

            if searched == 0 {
                bail!("query file {} contains no sequences", query.display());
            }
            log::info!("Searched {searched} queries");
        }
    }

    Ok(())
}
