//! Local Kemenization, plain and weighted.
//!
//! Full Kemeny-optimal aggregation is NP-hard. Local Kemenization settles for
//! an order where no adjacent transposition is preferred by a majority of the
//! input rankers. Both variants count an item missing from a ranker as ranked
//! after everything that ranker does hold.

use std::cmp::Ordering;

use tracing::debug;

use crate::{RankingIndex, Weights};

/// Votes of `rankers` on whether `above` should stay ahead of `below`.
///
/// Returns `(pro, con)`. Rankers that tie the two (both absent) abstain.
fn tally(rankers: &[RankingIndex], above: &str, below: &str) -> (usize, usize) {
    let mut pro = 0;
    let mut con = 0;
    for ranker in rankers {
        match ranker.rank_or_last(below).cmp(&ranker.rank_or_last(above)) {
            Ordering::Greater => pro += 1,
            Ordering::Less => con += 1,
            Ordering::Equal => {}
        }
    }
    (pro, con)
}

/// Insertion pass: each item bubbles up while a strict majority of rankers
/// prefers it to the item directly above. Returns the number of swaps.
///
/// The result is a fixed point: running it again performs no swaps.
pub(crate) fn local_kemenization(
    rankers: &[RankingIndex],
    aggregate: &mut RankingIndex,
) -> usize {
    let mut swaps = 0;

    for i in 1..aggregate.len() {
        let Some(current) = aggregate.id_at(i).map(str::to_owned) else {
            continue;
        };
        for j in (0..i).rev() {
            let Some(above) = aggregate.id_at(j).map(str::to_owned) else {
                break;
            };
            let (pro, con) = tally(rankers, &above, &current);
            if con <= pro {
                break;
            }
            aggregate.swap(&above, &current);
            swaps += 1;
        }
    }

    debug!(rankers = rankers.len(), swaps, "local kemenization done");
    swaps
}

/// Weighted-majority preference over the aggregate's starting positions.
///
/// `keeps(i, j)` for `i < j` is true when rankers supporting "position `i`
/// before position `j`" carry at least half the total weight.
struct PreferenceMatrix {
    n: usize,
    keep: Vec<bool>,
}

impl PreferenceMatrix {
    fn build(rankers: &[RankingIndex], aggregate: &RankingIndex, weights: &Weights) -> Self {
        let ids = aggregate.ids();
        let n = ids.len();
        let total = weights.total();
        let mut keep = vec![false; n * n];

        for i in 0..n {
            for j in i + 1..n {
                let support: u64 = rankers
                    .iter()
                    .zip(weights.as_slice())
                    .filter(|(ranker, _)| {
                        ranker.rank_or_last(&ids[i]) <= ranker.rank_or_last(&ids[j])
                    })
                    .map(|(_, &w)| u64::from(w))
                    .sum();
                keep[i * n + j] = 2 * support >= total;
            }
        }

        Self { n, keep }
    }

    fn keeps(&self, i: usize, j: usize) -> bool {
        self.keep[i * self.n + j]
    }
}

/// Single backward-scanning pass driven by a weighted-majority matrix.
///
/// The matrix is computed once from the starting order. Then for every
/// position `i`, the item that started there is swapped with the item now at
/// each earlier position `j` whose starting pair `(j, i)` lost the weighted
/// vote. There is no early exit and no second pass. Returns the number of
/// swaps.
///
/// `weights` must hold one entry per ranker.
pub(crate) fn supervised_local_kemenization(
    rankers: &[RankingIndex],
    aggregate: &mut RankingIndex,
    weights: &Weights,
) -> usize {
    let matrix = PreferenceMatrix::build(rankers, aggregate, weights);
    let mut swaps = 0;

    for i in 1..aggregate.len() {
        let Some(current) = aggregate.id_at(i).map(str::to_owned) else {
            continue;
        };
        for j in (0..i).rev() {
            if matrix.keeps(j, i) {
                continue;
            }
            let Some(above) = aggregate.id_at(j).map(str::to_owned) else {
                continue;
            };
            aggregate.swap(&above, &current);
            swaps += 1;
        }
    }

    debug!(
        rankers = rankers.len(),
        total_weight = weights.total(),
        swaps,
        "supervised local kemenization done"
    );
    swaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoredItem;

    fn index(ids: &[&str]) -> RankingIndex {
        let items: Vec<_> = ids.iter().map(|&id| ScoredItem::new(id, 0.0)).collect();
        RankingIndex::from_items(&items).unwrap()
    }

    #[test]
    fn tally_counts_absent_as_last() {
        let rankers = [index(&["a", "b"]), index(&["b"]), index(&["c"])];
        // ranker 0: a above b (pro), ranker 1: b present, a absent (con),
        // ranker 2: neither (abstain)
        assert_eq!(tally(&rankers, "a", "b"), (1, 1));
    }

    #[test]
    fn majority_reorders() {
        let rankers = [
            index(&["c", "a", "b"]),
            index(&["c", "b", "a"]),
            index(&["a", "c", "b"]),
        ];
        let mut aggregate = index(&["a", "b", "c"]);

        local_kemenization(&rankers, &mut aggregate);

        // c beats a 2-1 and b 3-0; a beats b 2-1.
        assert_eq!(aggregate.ids(), ["c", "a", "b"]);
    }

    #[test]
    fn split_vote_keeps_aggregate_order() {
        let rankers = [index(&["a", "b"]), index(&["b", "a"])];
        let mut aggregate = index(&["a", "b"]);

        assert_eq!(local_kemenization(&rankers, &mut aggregate), 0);
        assert_eq!(aggregate.ids(), ["a", "b"]);
    }

    #[test]
    fn second_run_is_a_fixed_point() {
        let rankers = [
            index(&["d", "b", "a", "c"]),
            index(&["b", "d", "c"]),
            index(&["a", "c", "d", "b"]),
        ];
        let mut aggregate = index(&["a", "b", "c", "d"]);

        local_kemenization(&rankers, &mut aggregate);
        let first = aggregate.ids().to_vec();

        assert_eq!(local_kemenization(&rankers, &mut aggregate), 0);
        assert_eq!(aggregate.ids(), first.as_slice());
    }

    #[test]
    fn equal_weights_on_a_split_keep_order() {
        let rankers = [index(&["a", "b", "c"]), index(&["b", "a", "c"])];
        let mut aggregate = index(&["a", "b", "c"]);
        let weights = Weights::new(vec![50, 50]);

        assert_eq!(supervised_local_kemenization(&rankers, &mut aggregate, &weights), 0);
        assert_eq!(aggregate.ids(), ["a", "b", "c"]);
    }

    #[test]
    fn heavier_ranker_wins() {
        let rankers = [index(&["a", "b"]), index(&["b", "a"])];

        let mut aggregate = index(&["b", "a"]);
        supervised_local_kemenization(&rankers, &mut aggregate, &Weights::new(vec![70, 30]));
        assert_eq!(aggregate.ids(), ["a", "b"]);

        let mut aggregate = index(&["b", "a"]);
        supervised_local_kemenization(&rankers, &mut aggregate, &Weights::new(vec![30, 70]));
        assert_eq!(aggregate.ids(), ["b", "a"]);
    }

    #[test]
    fn unanimous_reversal_is_single_pass() {
        let rankers = [index(&["c", "b", "a"])];
        let mut aggregate = index(&["a", "b", "c"]);

        let swaps = supervised_local_kemenization(&rankers, &mut aggregate, &Weights::uniform(1));

        // Every starting pair loses the vote, so every (j, i) forces a swap.
        assert_eq!(swaps, 3);
        assert_eq!(aggregate.ids(), ["c", "b", "a"]);
    }

    #[test]
    fn zero_total_weight_keeps_everything() {
        let rankers = [index(&["b", "a"])];
        let mut aggregate = index(&["a", "b"]);

        supervised_local_kemenization(&rankers, &mut aggregate, &Weights::new(vec![0]));

        assert_eq!(aggregate.ids(), ["a", "b"]);
    }

    #[test]
    fn five_rankers_are_supported() {
        let rankers: Vec<_> = (0..5)
            .map(|k| if k < 3 { index(&["b", "a"]) } else { index(&["a", "b"]) })
            .collect();
        let mut aggregate = index(&["a", "b"]);

        supervised_local_kemenization(&rankers, &mut aggregate, &Weights::uniform(5));

        assert_eq!(aggregate.ids(), ["b", "a"]);
    }
}
