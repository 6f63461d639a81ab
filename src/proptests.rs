//! Property tests for the index, the distance primitives and every method.

use proptest::prelude::*;

use crate::distance::{distance_avg, kendall_distance, mean_distance};
use crate::{
    adjacent, aggregate, aggregate_weighted, kemeny, validate, AggregationMethod, RankingIndex,
    ScoredItem, Weights, NOT_APPLICABLE_SCORE,
};

fn universe(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("m{i}")).collect()
}

#[allow(clippy::cast_precision_loss)]
fn items(ids: &[String]) -> Vec<ScoredItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| ScoredItem::new(id.clone(), 1.0 / (i as f32 + 1.0)))
        .collect()
}

fn index(ids: &[String]) -> RankingIndex {
    RankingIndex::from_items(&items(ids)).unwrap()
}

prop_compose! {
    /// An initial aggregate over `n` ids plus up to four partial rankers of them.
    fn scenario()(n in 1usize..8)(
        initial in Just(universe(n)).prop_shuffle(),
        rankers in prop::collection::vec(
            prop::sample::subsequence(universe(n), 0..=n).prop_shuffle(),
            0..5,
        )
    ) -> (Vec<String>, Vec<Vec<String>>) {
        (initial, rankers)
    }
}

proptest! {
    #[test]
    fn swap_twice_restores_index(
        ids in Just(universe(6)).prop_shuffle(),
        a in 0usize..6,
        b in 0usize..6
    ) {
        let original = index(&ids);
        let mut idx = original.clone();
        let (id_a, id_b) = (ids[a].clone(), ids[b].clone());

        idx.swap(&id_a, &id_b);
        idx.swap(&id_a, &id_b);

        prop_assert_eq!(idx.ids(), original.ids());
        for id in &ids {
            prop_assert_eq!(idx.rank_of(id), original.rank_of(id));
        }
    }

    #[test]
    fn swap_keeps_rank_lookup_consistent(
        ids in Just(universe(5)).prop_shuffle(),
        swaps in prop::collection::vec((0usize..5, 0usize..5), 0..20)
    ) {
        let mut idx = index(&ids);
        for (a, b) in swaps {
            idx.swap_at(a, b);
        }
        for (pos, id) in idx.ids().iter().enumerate() {
            prop_assert_eq!(idx.rank_of(id), Some(pos + 1));
        }
    }

    #[test]
    fn distance_to_self_is_zero(ids in Just(universe(7)).prop_shuffle()) {
        let x = index(&ids);
        prop_assert_eq!(kendall_distance(&x, &x), 0);
    }

    #[test]
    fn incremental_distance_tracks_full_recomputation(
        (initial, rankers) in scenario(),
        pos in 0usize..8
    ) {
        prop_assume!(initial.len() >= 2);
        let pos = pos % (initial.len() - 1);
        let rankers: Vec<_> = rankers.iter().map(|r| index(r)).collect();
        let mut agg = index(&initial);
        let mut distances: Vec<i64> = rankers
            .iter()
            .map(|r| kendall_distance(&agg, r) as i64)
            .collect();

        agg.swap_at(pos, pos + 1);
        let front = agg.id_at(pos).unwrap().to_string();
        let back = agg.id_at(pos + 1).unwrap().to_string();
        let mean = distance_avg(&rankers, &front, &back, &mut distances);

        for (r, &d) in rankers.iter().zip(&distances) {
            prop_assert_eq!(d, kendall_distance(&agg, r) as i64);
        }
        prop_assert!((mean - mean_distance(&rankers, &agg)).abs() < 1e-9);
    }

    #[test]
    fn adjacent_pairs_never_worsens_mean_distance((initial, rankers) in scenario()) {
        let rankers: Vec<_> = rankers.iter().map(|r| index(r)).collect();
        let mut agg = index(&initial);
        let before = mean_distance(&rankers, &agg);

        adjacent::adjacent_pairs(&rankers, &mut agg, 100);

        prop_assert!(mean_distance(&rankers, &agg) <= before + 1e-9);
    }

    #[test]
    fn local_kemenization_reaches_fixed_point((initial, rankers) in scenario()) {
        let rankers: Vec<_> = rankers.iter().map(|r| index(r)).collect();
        let mut agg = index(&initial);

        kemeny::local_kemenization(&rankers, &mut agg);

        prop_assert_eq!(kemeny::local_kemenization(&rankers, &mut agg), 0);
    }

    #[test]
    fn rank_based_methods_permute_and_reset_scores((initial, rankers) in scenario()) {
        let initial = items(&initial);
        let rankers: Vec<_> = rankers.iter().map(|r| items(r)).collect();

        for method in [AggregationMethod::AdjacentPairs, AggregationMethod::LocalKemenization] {
            let out = aggregate(&rankers, &initial, method).unwrap();
            let report = validate(method, &initial, &out);
            prop_assert!(report.is_valid, "{}: {:?}", method, report.errors);
        }

        let out = aggregate_weighted(&rankers, &initial, &Weights::uniform(rankers.len())).unwrap();
        prop_assert!(out.iter().all(|m| m.score == NOT_APPLICABLE_SCORE));
        let method = AggregationMethod::SupervisedLocalKemenization;
        prop_assert!(validate(method, &initial, &out).is_valid);
    }

    #[test]
    fn comb_mnz_scores_within_unit_interval((initial, rankers) in scenario()) {
        let initial = items(&initial);
        let rankers: Vec<_> = rankers.iter().map(|r| items(r)).collect();

        let out = aggregate(&rankers, &initial, AggregationMethod::CombMnz).unwrap();

        let report = validate(AggregationMethod::CombMnz, &initial, &out);
        prop_assert!(report.is_valid, "{:?}", report.errors);
    }

    #[test]
    fn supervised_is_deterministic(
        (initial, rankers) in scenario(),
        raw_weights in prop::collection::vec(0u32..100, 4)
    ) {
        let initial = items(&initial);
        let rankers: Vec<_> = rankers.iter().map(|r| items(r)).collect();
        let weights = Weights::new(raw_weights[..rankers.len()].to_vec());

        let first = aggregate_weighted(&rankers, &initial, &weights).unwrap();
        let second = aggregate_weighted(&rankers, &initial, &weights).unwrap();

        prop_assert_eq!(first, second);
    }
}
