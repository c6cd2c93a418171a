// tests/engine_parity.rs
// Every (precision, ISA) kernel must agree with the scalar 64-bit engine on
// every lane it does not flag as saturated, and whole searches must not
// depend on the SIMD tier, the thread count or the chunk size.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ferrous_ssa::core::alignment::dispatch::{KernelBuffers, run_narrow};
use ferrous_ssa::core::alignment::escalation::Precision;
use ferrous_ssa::core::alignment::scalar::scalar_score;
use ferrous_ssa::core::alignment::types::AlignParams;
use ferrous_ssa::{GapCosts, InMemoryDatabase, QueryPacking, ScoreMatrix, SearchConfig, SearchType, Searcher, SimdCapability};

const SEARCH_TYPES: [SearchType; 3] = [
    SearchType::SmithWaterman,
    SearchType::NeedlemanWunsch,
    SearchType::NeedlemanWunschSellers,
];

const CAPABILITIES: [SimdCapability; 3] = [SimdCapability::Portable, SimdCapability::Sse41, SimdCapability::Avx2];

fn random_seq(rng: &mut StdRng, min: usize, max: usize) -> Vec<u8> {
    let len = rng.gen_range(min..=max);
    (0..len).map(|_| rng.gen_range(0..4u8)).collect()
}

#[test]
fn narrow_kernels_match_scalar() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0001);
    let matrix = ScoreMatrix::constant(5, 2, -3);
    let gaps = GapCosts::new(3, 1);

    let mut db: Vec<Vec<u8>> = (0..45).map(|_| random_seq(&mut rng, 0, 70)).collect();
    // Empty database entries sit between kernel lanes.
    db.insert(7, Vec::new());
    db.push(Vec::new());
    let seqs: Vec<&[u8]> = db.iter().map(Vec::as_slice).collect();
    let indices: Vec<usize> = (0..seqs.len()).collect();

    for _ in 0..4 {
        let query = random_seq(&mut rng, 1, 60);
        for search_type in SEARCH_TYPES {
            let params = AlignParams::new(search_type, &query, &matrix, gaps);
            for capability in CAPABILITIES {
                for precision in [Precision::Narrow8, Precision::Narrow16] {
                    let mut buffers = KernelBuffers::default();
                    let mut out = Vec::new();
                    run_narrow(capability, precision, &params, &seqs, &indices, &mut buffers, &mut out).unwrap();
                    assert_eq!(out.len(), seqs.len());
                    for (idx, outcome) in out.iter().enumerate() {
                        if outcome.overflow {
                            assert_eq!(precision, Precision::Narrow8, "16-bit lanes cannot saturate here");
                            continue;
                        }
                        assert_eq!(
                            outcome.score,
                            scalar_score(&params, seqs[idx]),
                            "{search_type} {precision} on {capability}, db {idx}"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn searches_agree_across_tiers_threads_and_chunks() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0002);
    let db = InMemoryDatabase::from_sequences((0..120).map(|_| random_seq(&mut rng, 5, 120)).collect());
    let query = QueryPacking::single(random_seq(&mut rng, 40, 80));

    for search_type in SEARCH_TYPES {
        let base = SearchConfig::new(search_type, ScoreMatrix::constant(5, 2, -3))
            .with_gaps(3, 1)
            .with_hit_count(15);
        let reference = Searcher::new(base.clone().with_max_capability(SimdCapability::Portable).with_threads(1))
            .unwrap()
            .search(&query, &db)
            .unwrap();

        for capability in CAPABILITIES {
            for (threads, chunk) in [(1, 1000), (4, 7), (3, 1)] {
                let config = base
                    .clone()
                    .with_max_capability(capability)
                    .with_threads(threads)
                    .with_chunk_size(chunk);
                let result = Searcher::new(config).unwrap().search(&query, &db).unwrap();
                assert_eq!(result.hits, reference.hits, "{search_type} on {capability}, {threads} threads");
            }
        }
    }
}
