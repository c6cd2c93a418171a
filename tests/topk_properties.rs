// tests/topk_properties.rs
// The collector keeps exactly the K best hits under (score desc, db id asc,
// query id asc), whatever the insertion order or merge tree.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use ferrous_ssa::{Hit, TopK};

fn expected_top(hits: &[Hit], k: usize) -> Vec<Hit> {
    let mut all = hits.to_vec();
    all.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.db_id.cmp(&b.db_id))
            .then(a.query_id.cmp(&b.query_id))
    });
    all.truncate(k);
    all
}

fn random_hits(rng: &mut StdRng, n: usize) -> Vec<Hit> {
    // Narrow score range so ties are common.
    (0..n)
        .map(|db_id| Hit::new(db_id, rng.gen_range(0..6), rng.gen_range(-5..15)))
        .collect()
}

#[test]
fn keeps_exact_top_k_in_any_order() {
    let mut rng = StdRng::seed_from_u64(0x70_9C);
    for k in [1, 3, 10, 64] {
        let mut hits = random_hits(&mut rng, 200);
        let expected = expected_top(&hits, k);
        for _ in 0..5 {
            hits.shuffle(&mut rng);
            let mut topk = TopK::new(k);
            for &h in &hits {
                topk.add(h);
                assert!(topk.len() <= k);
            }
            assert_eq!(topk.into_sorted(), expected);
        }
    }
}

#[test]
fn merge_tree_shape_does_not_matter() {
    let mut rng = StdRng::seed_from_u64(0x70_9D);
    let hits = random_hits(&mut rng, 500);
    let k = 12;
    let expected = expected_top(&hits, k);

    for parts in [2, 7, 31] {
        let mut collectors: Vec<TopK> = (0..parts).map(|_| TopK::new(k)).collect();
        for &h in &hits {
            let idx = rng.gen_range(0..parts);
            collectors[idx].add(h);
        }
        // Left fold and pairwise fold must agree.
        let folded = collectors.clone().into_iter().fold(TopK::new(k), TopK::merge);
        assert_eq!(folded.sorted(), expected);

        while collectors.len() > 1 {
            let mut next = Vec::new();
            let mut iter = collectors.into_iter();
            while let Some(a) = iter.next() {
                next.push(match iter.next() {
                    Some(b) => b.merge(a),
                    None => a,
                });
            }
            collectors = next;
        }
        assert_eq!(collectors.pop().map(TopK::into_sorted), Some(expected.clone()));
    }
}

#[test]
fn fewer_hits_than_capacity() {
    let mut topk = TopK::new(10);
    for (i, s) in [4, -2, 9].into_iter().enumerate() {
        assert!(topk.add(Hit::new(i, 0, s)));
    }
    assert_eq!(topk.capacity(), 10);
    assert_eq!(
        topk.sorted(),
        vec![Hit::new(2, 0, 9), Hit::new(0, 0, 4), Hit::new(1, 0, -2)]
    );
}
