// tests/overflow_escalation.rs
// Scores that do not fit 8 or 16 bits must come back exact, and the
// escalation counters must say how many sequences were rescored.

use ferrous_ssa::alphabet::Alphabet;
use ferrous_ssa::core::alignment::scalar::scalar_score;
use ferrous_ssa::core::alignment::types::AlignParams;
use ferrous_ssa::{
    BitWidth, GapCosts, Hit, InMemoryDatabase, QueryPacking, ScoreMatrix, SearchConfig, SearchType, Searcher,
    SequenceDatabase, SimdCapability,
};

fn poly_a(n: usize) -> Vec<u8> {
    Alphabet::Nucleotide.encode("A".repeat(n).as_bytes())
}

#[test]
fn sw_escalates_through_both_tiers() {
    let config = SearchConfig::new(SearchType::SmithWaterman, ScoreMatrix::constant(5, 10, -10)).with_gaps(3, 1);
    let searcher = Searcher::new(config).unwrap();
    // 70000 needs 64 bits, 1000 needs 16 bits, 200 fits 8 bits.
    let db = InMemoryDatabase::from_sequences(vec![poly_a(20), poly_a(7000), poly_a(100)]);
    let result = searcher.search(&QueryPacking::single(poly_a(7000)), &db).unwrap();

    assert_eq!(
        result.hits,
        vec![Hit::new(1, 0, 70_000), Hit::new(2, 0, 1000), Hit::new(0, 0, 200)]
    );
    assert_eq!(result.overflow_8_bit_count, 2);
    assert_eq!(result.overflow_16_bit_count, 1);
}

#[test]
fn starting_width_skips_narrow_tiers() {
    let config = SearchConfig::new(SearchType::SmithWaterman, ScoreMatrix::constant(5, 10, -10))
        .with_gaps(3, 1)
        .with_start_width(BitWidth::W16);
    let searcher = Searcher::new(config).unwrap();
    let db = InMemoryDatabase::from_sequences(vec![poly_a(100), poly_a(20)]);
    let result = searcher.search(&QueryPacking::single(poly_a(100)), &db).unwrap();

    assert_eq!(result.hits, vec![Hit::new(0, 0, 1000), Hit::new(1, 0, 200)]);
    assert_eq!(result.overflow_8_bit_count, 0);
    assert_eq!(result.overflow_16_bit_count, 0);
}

#[test]
fn nw_negative_scores_escalate() {
    let nt = Alphabet::Nucleotide;
    let matrix = ScoreMatrix::constant(5, 1, -1);
    let config = SearchConfig::new(SearchType::NeedlemanWunsch, matrix.clone()).with_gaps(3, 1);
    let query = nt.encode("A".repeat(300).as_bytes());
    let db = InMemoryDatabase::from_sequences(vec![
        nt.encode("C".repeat(300).as_bytes()),
        nt.encode(b"AAAA"),
        query.clone(),
    ]);

    for capability in [SimdCapability::Portable, SimdCapability::Avx2] {
        let searcher = Searcher::new(config.clone().with_max_capability(capability)).unwrap();
        let result = searcher.search(&QueryPacking::single(query.clone()), &db).unwrap();
        let params = AlignParams::new(SearchType::NeedlemanWunsch, &query, &matrix, GapCosts::new(3, 1));
        for hit in &result.hits {
            assert_eq!(hit.score, scalar_score(&params, db.sequence(hit.db_id).unwrap()));
        }
        assert_eq!(result.hits[0], Hit::new(2, 0, 300));
        assert_eq!(result.hits[2], Hit::new(0, 0, -300));
        // The left boundary column alone (-303) is below i8::MIN, so the
        // whole window is rescored at 16 bits.
        assert_eq!(result.overflow_8_bit_count, 3);
        assert_eq!(result.overflow_16_bit_count, 0);
    }
}

#[test]
fn scoring_outside_narrow_domains_goes_straight_to_wide_tiers() {
    // Matrix entries beyond i8: the 8-bit tier is skipped without counting.
    let config = SearchConfig::new(SearchType::SmithWaterman, ScoreMatrix::constant(5, 300, -300)).with_gaps(3, 1);
    let searcher = Searcher::new(config).unwrap();
    let db = InMemoryDatabase::from_sequences(vec![poly_a(3)]);
    let result = searcher.search(&QueryPacking::single(poly_a(3)), &db).unwrap();
    assert_eq!(result.hits, vec![Hit::new(0, 0, 900)]);
    assert_eq!(result.overflow_8_bit_count, 0);
    assert_eq!(result.overflow_16_bit_count, 0);
}
