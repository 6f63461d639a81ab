//! Indexed view over one ranking.
//!
//! A [`RankingIndex`] keeps three views of the same ranking in lockstep:
//!
//! - id → item (the owned [`ScoredItem`], plus its position at construction)
//! - id → rank (1-based)
//! - rank → id (`ids[rank - 1]`)
//!
//! Rank and score lookups are O(1), and so are swaps. The invariant
//! `ids[rank_of(id) - 1] == id` holds after every public method returns.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{AggregationError, Result, ScoredItem, NOT_APPLICABLE_SCORE};

#[derive(Debug, Clone)]
struct Slot {
    item: ScoredItem,
    /// Position at construction (0-based). Tie-breaker for score ordering.
    origin: usize,
}

/// A ranking with O(1) rank lookup and O(1) swaps.
///
/// # Example
///
/// ```rust
/// use concord::{RankingIndex, ScoredItem};
///
/// let items = vec![ScoredItem::new("a", 0.9), ScoredItem::new("b", 0.5)];
/// let mut index = RankingIndex::from_items(&items).unwrap();
///
/// assert_eq!(index.rank_of("b"), Some(2));
/// index.swap("a", "b");
/// assert_eq!(index.id_at(0), Some("b"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RankingIndex {
    slots: HashMap<String, Slot>,
    ranks: HashMap<String, usize>,
    ids: Vec<String>,
}

impl RankingIndex {
    /// Index `items`, assigning ranks `1..=N` in input order.
    ///
    /// Items are cloned; the caller's slice is never touched again.
    ///
    /// # Errors
    ///
    /// Returns [`AggregationError::DuplicateId`] if two items share an id.
    pub fn from_items(items: &[ScoredItem]) -> Result<Self> {
        let mut slots = HashMap::with_capacity(items.len());
        let mut ranks = HashMap::with_capacity(items.len());
        let mut ids = Vec::with_capacity(items.len());

        for (origin, item) in items.iter().enumerate() {
            if ranks.insert(item.id.clone(), origin + 1).is_some() {
                return Err(AggregationError::DuplicateId {
                    id: item.id.clone(),
                });
            }
            slots.insert(
                item.id.clone(),
                Slot {
                    item: item.clone(),
                    origin,
                },
            );
            ids.push(item.id.clone());
        }

        Ok(Self { slots, ranks, ids })
    }

    /// Number of items in the ranking.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the ranking holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 1-based rank of `id`, or `None` if the ranking does not contain it.
    #[must_use]
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Rank of `id`, with absent ids ranked after everything (`usize::MAX`).
    ///
    /// This is how every pairwise vote treats an item a ranker never saw.
    #[must_use]
    pub fn rank_or_last(&self, id: &str) -> usize {
        self.rank_of(id).unwrap_or(usize::MAX)
    }

    /// Whether the ranking contains `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ranks.contains_key(id)
    }

    /// Current score of `id`, or `None` if absent.
    #[must_use]
    pub fn score_of(&self, id: &str) -> Option<f32> {
        self.slots.get(id).map(|slot| slot.item.score)
    }

    /// Overwrite the score of `id`. No-op if absent.
    pub fn set_score(&mut self, id: &str, score: f32) {
        if let Some(slot) = self.slots.get_mut(id) {
            slot.item.score = score;
        }
    }

    /// Id at 0-based `position`, or `None` past the end.
    #[must_use]
    pub fn id_at(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    /// Ids in current rank order.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Exchange the positions of two ids.
    ///
    /// Self-inverse: `swap(a, b); swap(a, b)` restores the previous state.
    /// No-op if either id is absent.
    pub fn swap(&mut self, id1: &str, id2: &str) {
        let (Some(rank1), Some(rank2)) = (self.rank_of(id1), self.rank_of(id2)) else {
            return;
        };
        self.swap_ranks(rank1, rank2);
    }

    /// Exchange the ids at two 0-based positions. No-op if either is out of range.
    pub fn swap_at(&mut self, pos1: usize, pos2: usize) {
        if pos1 >= self.ids.len() || pos2 >= self.ids.len() {
            return;
        }
        self.swap_ranks(pos1 + 1, pos2 + 1);
    }

    fn swap_ranks(&mut self, rank1: usize, rank2: usize) {
        if rank1 == rank2 {
            return;
        }
        self.ids.swap(rank1 - 1, rank2 - 1);
        for rank in [rank1, rank2] {
            if let Some(r) = self.ranks.get_mut(&self.ids[rank - 1]) {
                *r = rank;
            }
        }
    }

    /// Set every score to [`NOT_APPLICABLE_SCORE`].
    ///
    /// Rank-based methods call this before materializing: their output
    /// carries an order, not a score.
    pub fn reset_scores_to_sentinel(&mut self) {
        for slot in self.slots.values_mut() {
            slot.item.score = NOT_APPLICABLE_SCORE;
        }
    }

    /// Items in current rank order.
    #[must_use]
    pub fn materialize_by_rank(&self) -> Vec<ScoredItem> {
        self.ids
            .iter()
            .filter_map(|id| self.slots.get(id))
            .map(|slot| slot.item.clone())
            .collect()
    }

    /// Items sorted by score, highest first.
    ///
    /// Equal scores keep their order from construction, so ties never drop
    /// or reorder items arbitrarily. Uses `f32::total_cmp`, so NaN sorts first.
    #[must_use]
    pub fn materialize_by_score(&self) -> Vec<ScoredItem> {
        let mut slots: Vec<&Slot> = self
            .ids
            .iter()
            .filter_map(|id| self.slots.get(id))
            .collect();
        slots.sort_by(|a, b| match b.item.score.total_cmp(&a.item.score) {
            Ordering::Equal => a.origin.cmp(&b.origin),
            other => other,
        });
        slots.into_iter().map(|slot| slot.item.clone()).collect()
    }

    #[cfg(test)]
    fn is_consistent(&self) -> bool {
        self.ids.len() == self.ranks.len()
            && self.ids.len() == self.slots.len()
            && self
                .ids
                .iter()
                .enumerate()
                .all(|(pos, id)| self.ranks.get(id) == Some(&(pos + 1)))
    }
}
