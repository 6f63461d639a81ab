//! Per-ranker importance weights for supervised local Kemenization.
//!
//! One non-negative integer per input ranker. A pair keeps its aggregate
//! order when the rankers agreeing with it carry at least half of the total
//! weight.
//!
//! Weights decoded from the legacy packed form may also carry weight that no
//! ranker casts: packed slots past the ranker count still count toward the
//! total, so they raise the bar every pair has to clear.

use crate::{AggregationError, Result};

/// Largest ranker count the legacy packed encoding can express.
pub const MAX_PACKED_RANKERS: usize = 4;

/// Base of each packed slot: two decimal digits per ranker.
const PACKED_BASE: u32 = 100;

/// Importance weight of each input ranker, in input order.
///
/// # Example
///
/// ```rust
/// use concord::Weights;
///
/// // Ranker 0 weighs 30, ranker 1 weighs 70.
/// let w = Weights::from_packed(7030, 2).unwrap();
/// assert_eq!(w.as_slice(), &[30, 70]);
/// assert_eq!(w.total(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    per_ranker: Vec<u32>,
    /// Weight of packed slots with no matching ranker. Counted in the total only.
    #[cfg_attr(feature = "serde", serde(default))]
    unassigned: u64,
}

impl Weights {
    /// Wrap explicit per-ranker weights.
    #[must_use]
    pub fn new(weights: Vec<u32>) -> Self {
        Self {
            per_ranker: weights,
            unassigned: 0,
        }
    }

    /// Equal weight `1` for each of `rankers` rankers.
    #[must_use]
    pub fn uniform(rankers: usize) -> Self {
        Self::new(vec![1; rankers])
    }

    /// Decode the legacy packed form: base-100 digit pairs, least significant
    /// pair first. `7030` → ranker 0 weighs 30, ranker 1 weighs 70.
    ///
    /// All [`MAX_PACKED_RANKERS`] slots are decoded. Slots past `rankers` get
    /// no ranker but still add to [`total`](Self::total), so `50_50_50` over
    /// two rankers needs 75 of 150 to keep a pair.
    ///
    /// # Errors
    ///
    /// [`AggregationError::TooManyPackedRankers`] if `rankers` exceeds
    /// [`MAX_PACKED_RANKERS`].
    pub fn from_packed(mut packed: u32, rankers: usize) -> Result<Self> {
        if rankers > MAX_PACKED_RANKERS {
            return Err(AggregationError::TooManyPackedRankers {
                rankers,
                max: MAX_PACKED_RANKERS,
            });
        }
        let mut per_ranker = Vec::with_capacity(rankers);
        let mut unassigned = 0u64;
        for slot in 0..MAX_PACKED_RANKERS {
            let weight = packed % PACKED_BASE;
            packed /= PACKED_BASE;
            if slot < rankers {
                per_ranker.push(weight);
            } else {
                unassigned += u64::from(weight);
            }
        }
        Ok(Self {
            per_ranker,
            unassigned,
        })
    }

    /// Number of rankers covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.per_ranker.len()
    }

    /// Whether no ranker has a weight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.per_ranker.is_empty()
    }

    /// Weight of ranker `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<u32> {
        self.per_ranker.get(i).copied()
    }

    /// Sum of all weights, including packed slots no ranker claimed.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.per_ranker.iter().map(|&w| u64::from(w)).sum::<u64>() + self.unassigned
    }

    /// Weights as a slice, in ranker order.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.per_ranker
    }

    /// Check there is exactly one weight per ranker.
    ///
    /// # Errors
    ///
    /// [`AggregationError::WeightCountMismatch`] otherwise.
    pub fn check_len(&self, rankers: usize) -> Result<()> {
        if self.per_ranker.len() == rankers {
            Ok(())
        } else {
            Err(AggregationError::WeightCountMismatch {
                expected: rankers,
                actual: self.per_ranker.len(),
            })
        }
    }
}

impl From<Vec<u32>> for Weights {
    fn from(weights: Vec<u32>) -> Self {
        Self::new(weights)
    }
}

impl From<&[u32]> for Weights {
    fn from(weights: &[u32]) -> Self {
        Self::new(weights.to_vec())
    }
}
