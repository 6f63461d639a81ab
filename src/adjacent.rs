//! Adjacent-pairs local search on mean Kendall-tau distance.
//!
//! Each pass walks the aggregate top to bottom and tries transposing every
//! adjacent pair. A transposition is kept only if it strictly lowers the mean
//! distance to the input rankers; ties are reverted, so an aggregate that is
//! already as close as any neighbour stays put.

use tracing::{debug, trace};

use crate::distance::{distance_avg, kendall_distance};
use crate::RankingIndex;

/// Run `passes` rounds of adjacent-pair improvement over `aggregate`.
///
/// Returns the number of transpositions kept. Always runs the full pass count.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
pub(crate) fn adjacent_pairs(
    rankers: &[RankingIndex],
    aggregate: &mut RankingIndex,
    passes: usize,
) -> usize {
    let mut distances: Vec<i64> = rankers
        .iter()
        .map(|ranker| kendall_distance(aggregate, ranker) as i64)
        .collect();
    let mut best = if rankers.is_empty() {
        0.0
    } else {
        distances.iter().sum::<i64>() as f64 / rankers.len() as f64
    };
    debug!(rankers = rankers.len(), initial_mean = best, "adjacent pairs start");

    let mut tentative = distances.clone();
    let mut kept = 0;

    for pass in 0..passes {
        let mut kept_this_pass = 0;
        for pos in 0..aggregate.len().saturating_sub(1) {
            aggregate.swap_at(pos, pos + 1);

            tentative.copy_from_slice(&distances);
            let ids = aggregate.ids();
            let mean = distance_avg(rankers, &ids[pos], &ids[pos + 1], &mut tentative);

            if mean < best {
                best = mean;
                distances.copy_from_slice(&tentative);
                kept_this_pass += 1;
            } else {
                aggregate.swap_at(pos, pos + 1);
            }
        }
        trace!(pass, kept = kept_this_pass, mean = best, "adjacent pairs pass");
        kept += kept_this_pass;
    }

    debug!(kept, final_mean = best, "adjacent pairs done");
    kept
}
