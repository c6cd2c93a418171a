// tests/dispatch_policy.rs
// Validate SIMD tier selection and window sizing.

use ferrous_ssa::core::alignment::dispatch::lanes_for;
use ferrous_ssa::core::alignment::escalation::Precision;
use ferrous_ssa::core::compute::simd_abstraction::{detect_simd_capability, effective_capability};
use ferrous_ssa::{ScoreMatrix, SearchConfig, SearchType, Searcher, SimdCapability};

#[test]
fn configured_maximum_caps_detection() {
    let detected = detect_simd_capability();
    for max in [SimdCapability::Portable, SimdCapability::Sse41, SimdCapability::Avx2] {
        let cap = effective_capability(max);
        assert!(cap <= max);
        assert!(cap <= detected);

        let config = SearchConfig::new(SearchType::SmithWaterman, ScoreMatrix::constant(5, 1, -1))
            .with_max_capability(max);
        assert_eq!(Searcher::new(config).unwrap().capability(), cap);
    }
    assert_eq!(effective_capability(SimdCapability::Portable), SimdCapability::Portable);
}

#[test]
fn window_lanes_per_precision() {
    assert_eq!(lanes_for(SimdCapability::Avx2, Precision::Narrow8), 32);
    assert_eq!(lanes_for(SimdCapability::Avx2, Precision::Narrow16), 16);
    assert_eq!(lanes_for(SimdCapability::Sse41, Precision::Narrow8), 16);
    assert_eq!(lanes_for(SimdCapability::Portable, Precision::Narrow16), 8);
    assert_eq!(lanes_for(SimdCapability::Avx2, Precision::Exact64), 1);
}

#[test]
fn capability_names_round_trip() {
    for cap in [SimdCapability::Portable, SimdCapability::Sse41, SimdCapability::Avx2] {
        assert_eq!(cap.to_string().parse::<SimdCapability>(), Ok(cap));
        assert!(!cap.description().is_empty());
    }
    assert!("avx512".parse::<SimdCapability>().is_err());
}
