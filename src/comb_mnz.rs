//! `CombMNZ` over Borda-normalized ranks.
//!
//! # Formula
//!
//! For an item `d` in an aggregate of length `N`, fused from `s` rankers:
//!
//! ```text
//! borda_r(d) = 1 - (rank_r(d) - 1) / N        for each ranker r containing d
//! score(d)   = (Σ_r borda_r(d)) × |{r : d ∈ r}| / s²
//! ```
//!
//! The normalization base is the aggregate's length for every ranker, not the
//! ranker's own length. Dividing by `s²` (the largest possible raw score)
//! keeps scores in `[0, 1]`.
//!
//! `borda_r(d) × N` is the integer `N - rank_r(d) + 1`, so the sum is kept in
//! integer "points" and divided once. Scores then do not depend on the order
//! in which rankers are visited.

use tracing::debug;

use crate::RankingIndex;

/// Score every aggregate item in place. Returns how many items got a score.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub(crate) fn comb_mnz(rankers: &[RankingIndex], aggregate: &mut RankingIndex) -> usize {
    let s = rankers.len();
    let n = aggregate.len();
    let max_points = (n * s * s) as f64;

    let scores: Vec<(String, f32)> = aggregate
        .ids()
        .iter()
        .map(|id| {
            let mut hits = 0usize;
            let mut points = 0usize;
            for rank in rankers.iter().filter_map(|ranker| ranker.rank_of(id)) {
                hits += 1;
                // Rankers longer than the aggregate would go negative past rank N + 1.
                points += (n + 1).saturating_sub(rank);
            }
            let score = if max_points > 0.0 {
                ((points * hits) as f64 / max_points) as f32
            } else {
                0.0
            };
            (id.clone(), score)
        })
        .collect();

    for (id, score) in &scores {
        aggregate.set_score(id, *score);
    }

    debug!(rankers = s, items = scores.len(), "combmnz scored");
    scores.len()
}
