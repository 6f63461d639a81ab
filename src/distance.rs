//! Kendall-tau style disagreement between an aggregate and its input rankers.
//!
//! The aggregate usually covers the union of all inputs, while each ranker may
//! only rank a subset. [`kendall_distance`] counts two kinds of disagreeing
//! pairs:
//!
//! 1. an aggregate item the ranker lacks, ranked above an item it has
//! 2. a pair the ranker orders one way and the aggregate the other
//!
//! The adjacent-pairs search never recomputes this from scratch after a swap;
//! [`distance_avg`] patches the cached per-ranker distances in O(rankers).

use std::cmp::Ordering;

use crate::RankingIndex;

/// Number of ordered-pair disagreements between `aggregate` and `ranker`.
///
/// `kendall_distance(x, x) == 0` for any ranking `x`.
///
/// Items the ranker holds but the aggregate lacks rank ahead of everything on
/// the aggregate side (`None < Some(_)`).
///
/// # Complexity
///
/// O(|aggregate| + |ranker|²).
#[must_use]
pub fn kendall_distance(aggregate: &RankingIndex, ranker: &RankingIndex) -> usize {
    let mut disagreements = 0;

    if !ranker.is_empty() {
        let mut missing_so_far = 0;
        for id in aggregate.ids() {
            if ranker.contains(id) {
                disagreements += missing_so_far;
            } else {
                missing_so_far += 1;
            }
        }
    }

    let ids = ranker.ids();
    for (i, id1) in ids.iter().enumerate() {
        let rank1 = aggregate.rank_of(id1);
        for id2 in &ids[i + 1..] {
            if rank1 > aggregate.rank_of(id2) {
                disagreements += 1;
            }
        }
    }

    disagreements
}

/// Mean [`kendall_distance`] from `aggregate` to each ranker. `0.0` with no rankers.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_distance(rankers: &[RankingIndex], aggregate: &RankingIndex) -> f64 {
    if rankers.is_empty() {
        return 0.0;
    }
    let total: usize = rankers
        .iter()
        .map(|ranker| kendall_distance(aggregate, ranker))
        .sum();
    total as f64 / rankers.len() as f64
}

/// Patch cached distances after `id1` and `id2` traded places in the aggregate.
///
/// `id1` is the id now ranked first of the two. For each ranker, the pair
/// becomes a disagreement (+1) if the ranker puts `id1` after `id2`, and stops
/// being one (-1) if it puts `id1` first. Absent ids rank last.
///
/// A ranker holding neither id is left as is rather than decremented: it
/// ranks both last, so the swap changes none of its disagreements and a full
/// [`kendall_distance`] recomputation would give the same value.
///
/// Only valid for a swap of adjacent aggregate positions, where exactly one
/// pair changes relative order. Returns the mean of the patched distances
/// (`0.0` with no rankers).
///
/// # Panics
///
/// If `distances` does not hold exactly one entry per ranker.
#[allow(clippy::cast_precision_loss)]
pub fn distance_avg(
    rankers: &[RankingIndex],
    id1: &str,
    id2: &str,
    distances: &mut [i64],
) -> f64 {
    assert_eq!(
        rankers.len(),
        distances.len(),
        "one cached distance per ranker"
    );

    let mut sum = 0i64;
    for (ranker, distance) in rankers.iter().zip(distances.iter_mut()) {
        match ranker.rank_or_last(id1).cmp(&ranker.rank_or_last(id2)) {
            Ordering::Greater => *distance += 1,
            Ordering::Less => *distance -= 1,
            Ordering::Equal => {}
        }
        sum += *distance;
    }

    if rankers.is_empty() {
        0.0
    } else {
        sum as f64 / rankers.len() as f64
    }
}
