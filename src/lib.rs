//! Rank aggregation for ensembles of ranked lists.
//!
//! Fuse the rankings of several models into one consensus ranking, using
//! Kendall-tau distance, Borda normalization and local Kemenization.
//!
//! ```rust
//! use concord::{aggregate, AggregationMethod, ScoredItem};
//!
//! let r1 = vec![ScoredItem::new("a", 0.9), ScoredItem::new("b", 0.7), ScoredItem::new("c", 0.1)];
//! let r2 = vec![ScoredItem::new("c", 0.8), ScoredItem::new("a", 0.6), ScoredItem::new("b", 0.2)];
//! let r3 = vec![ScoredItem::new("c", 0.9), ScoredItem::new("b", 0.3), ScoredItem::new("a", 0.1)];
//!
//! let fused = aggregate(&[&r1, &r2, &r3], &r1, AggregationMethod::LocalKemenization).unwrap();
//! let ids: Vec<_> = fused.iter().map(|m| m.id.as_str()).collect();
//! assert_eq!(ids, ["c", "a", "b"]);
//! ```
//!
//! # Aggregation Methods
//!
//! | Method | Output | Idea |
//! |--------|--------|------|
//! | [`AggregationMethod::AdjacentPairs`] | Order | Keep adjacent swaps that lower mean Kendall-tau distance |
//! | [`AggregationMethod::CombMnz`] | Scores in `[0, 1]` | Borda-normalized ranks, summed × number of lists containing the item |
//! | [`AggregationMethod::LocalKemenization`] | Order | No adjacent pair is overturned by a strict majority |
//! | [`AggregationMethod::SupervisedLocalKemenization`] | Order | Same, with a weighted majority ([`Weights`]) |
//! | [`AggregationMethod::Default`] | Unchanged | Returns the initial aggregate |
//!
//! Order-only methods set every output score to [`NOT_APPLICABLE_SCORE`].
//!
//! # Ownership
//!
//! Every entry point borrows its inputs and returns a fresh list. The initial
//! aggregate is the starting point of the search, never modified in place.
//!
//! # Optimality
//!
//! Local methods only guarantee local optimality. A Kemeny-optimal ranking
//! (minimal total disagreement over all permutations) is NP-hard to find and
//! out of scope.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

mod adjacent;
mod comb_mnz;
pub mod distance;
mod index;
mod kemeny;
pub mod validate;
mod weights;

#[cfg(test)]
mod proptests;

pub use distance::{distance_avg, kendall_distance, mean_distance};
pub use index::RankingIndex;
pub use validate::{
    validate, validate_bounds, validate_no_duplicates, validate_not_applicable_scores,
    validate_permutation, validate_sorted_desc, ValidationResult,
};
pub use weights::{Weights, MAX_PACKED_RANKERS};

// ─────────────────────────────────────────────────────────────────────────────
// Items
// ─────────────────────────────────────────────────────────────────────────────

/// Score written to every item by order-only methods.
///
/// Marks the score as "not produced", not as a real score of `-1`.
pub const NOT_APPLICABLE_SCORE: f32 = -1.0;

/// An item in a ranking: a stable id and a score.
///
/// Identity is the id. Two items with the same id are the same item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredItem {
    /// Unique, stable identifier.
    pub id: String,
    /// Score assigned by the ranker (or by `CombMNZ`).
    pub score: f32,
}

impl ScoredItem {
    /// Create an item.
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// A ranking lists the same id twice.
    #[error("duplicate id {id:?} in ranking")]
    DuplicateId {
        /// The repeated id.
        id: String,
    },
    /// Supervised local Kemenization was requested without weights.
    #[error("supervised local kemenization requires ranker weights")]
    MissingWeights,
    /// Weights do not cover the input rankers one-to-one.
    #[error("expected {expected} ranker weights, got {actual}")]
    WeightCountMismatch {
        /// Number of input rankers.
        expected: usize,
        /// Number of weights supplied.
        actual: usize,
    },
    /// The packed weight encoding cannot describe this many rankers.
    #[error("packed weights support at most {max} rankers, got {rankers}")]
    TooManyPackedRankers {
        /// Number of input rankers.
        rankers: usize,
        /// Capacity of the packed encoding.
        max: usize,
    },
    /// A method name did not parse.
    #[error("unknown aggregation method {0:?}")]
    UnknownMethod(String),
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggregationError>;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Passes of the adjacent-pairs search when not configured.
pub const DEFAULT_PASSES: usize = 100;

/// Aggregation configuration.
///
/// # Example
///
/// ```rust
/// use concord::{AggregationConfig, Weights};
///
/// let config = AggregationConfig::default()
///     .with_passes(20)
///     .with_weights(Weights::new(vec![3, 1]));
/// assert_eq!(config.passes, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregationConfig {
    /// Full passes over the aggregate made by adjacent pairs (default: 100).
    ///
    /// The search always runs every pass, even after it stops improving.
    pub passes: usize,
    /// Per-ranker weights. Required by supervised local Kemenization,
    /// ignored by every other method.
    pub weights: Option<Weights>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            passes: DEFAULT_PASSES,
            weights: None,
        }
    }
}

impl AggregationConfig {
    /// Set the number of adjacent-pairs passes.
    #[must_use]
    pub const fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    /// Set per-ranker weights.
    #[must_use]
    pub fn with_weights(mut self, weights: impl Into<Weights>) -> Self {
        self.weights = Some(weights.into());
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Method Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Which aggregation algorithm to run.
///
/// Parses from the upper-case names (`"ADJACENT_PAIRS"`) or their lower-case
/// forms (`"comb_mnz"`). Nothing else is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AggregationMethod {
    /// Return the initial aggregate unchanged.
    #[default]
    Default,
    /// Local search over adjacent transpositions, minimizing mean Kendall-tau
    /// distance.
    AdjacentPairs,
    /// `CombMNZ` over Borda-normalized ranks. Score-based.
    CombMnz,
    /// Insertion pass to a local Kemeny optimum (unweighted majority).
    LocalKemenization,
    /// Single pass against a weighted-majority preference matrix.
    SupervisedLocalKemenization,
}

impl AggregationMethod {
    /// All methods, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::AdjacentPairs,
        Self::CombMnz,
        Self::LocalKemenization,
        Self::SupervisedLocalKemenization,
    ];

    /// Human-readable name of this method.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::AdjacentPairs => "adjacent_pairs",
            Self::CombMnz => "comb_mnz",
            Self::LocalKemenization => "local_kemenization",
            Self::SupervisedLocalKemenization => "supervised_local_kemenization",
        }
    }

    /// Whether output scores carry meaning (true) or are all
    /// [`NOT_APPLICABLE_SCORE`] (false for order-only methods).
    #[must_use]
    pub const fn uses_scores(self) -> bool {
        matches!(self, Self::CombMnz)
    }

    /// Whether this method reorders by rank alone and resets scores.
    #[must_use]
    pub const fn is_rank_based(self) -> bool {
        matches!(
            self,
            Self::AdjacentPairs | Self::LocalKemenization | Self::SupervisedLocalKemenization
        )
    }
}

impl fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationMethod {
    type Err = AggregationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|method| {
                let name = method.name();
                s == name || s == name.to_ascii_uppercase()
            })
            .ok_or_else(|| AggregationError::UnknownMethod(s.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Aggregate `inputs` starting from `initial`, with default configuration.
///
/// # Errors
///
/// See [`aggregate_with_config`]. Supervised local Kemenization always fails
/// here with [`AggregationError::MissingWeights`]; use
/// [`aggregate_weighted`] instead.
pub fn aggregate<L>(
    inputs: &[L],
    initial: &[ScoredItem],
    method: AggregationMethod,
) -> Result<Vec<ScoredItem>>
where
    L: AsRef<[ScoredItem]>,
{
    aggregate_with_config(inputs, initial, method, &AggregationConfig::default())
}

/// Supervised local Kemenization with one weight per input ranking.
///
/// # Errors
///
/// See [`aggregate_with_config`].
pub fn aggregate_weighted<L>(
    inputs: &[L],
    initial: &[ScoredItem],
    weights: &Weights,
) -> Result<Vec<ScoredItem>>
where
    L: AsRef<[ScoredItem]>,
{
    let config = AggregationConfig::default().with_weights(weights.clone());
    aggregate_with_config(
        inputs,
        initial,
        AggregationMethod::SupervisedLocalKemenization,
        &config,
    )
}

/// Aggregate with weights in the legacy packed form (see
/// [`Weights::from_packed`]). `packed` is decoded only for supervised local
/// Kemenization. Every packed slot counts toward the total weight, including
/// slots past the number of inputs.
///
/// # Errors
///
/// [`AggregationError::TooManyPackedRankers`] for supervised local
/// Kemenization over more than [`MAX_PACKED_RANKERS`] inputs, plus everything
/// [`aggregate_with_config`] returns.
pub fn aggregate_packed<L>(
    inputs: &[L],
    initial: &[ScoredItem],
    method: AggregationMethod,
    packed: u32,
) -> Result<Vec<ScoredItem>>
where
    L: AsRef<[ScoredItem]>,
{
    let mut config = AggregationConfig::default();
    if method == AggregationMethod::SupervisedLocalKemenization && !initial.is_empty() {
        config.weights = Some(Weights::from_packed(packed, inputs.len())?);
    }
    aggregate_with_config(inputs, initial, method, &config)
}

/// Aggregate `inputs` starting from `initial`.
///
/// The initial aggregate fixes the item universe: the output is always a
/// permutation of `initial`. Items of `inputs` that `initial` lacks only take
/// part in distance computations.
///
/// An empty `initial` returns an empty list for every method, and
/// [`AggregationMethod::Default`] returns a copy of `initial`. Neither
/// validates its inputs.
///
/// # Errors
///
/// - [`AggregationError::DuplicateId`] if any ranking repeats an id.
/// - [`AggregationError::MissingWeights`] or
///   [`AggregationError::WeightCountMismatch`] for supervised local
///   Kemenization without exactly one weight per input.
pub fn aggregate_with_config<L>(
    inputs: &[L],
    initial: &[ScoredItem],
    method: AggregationMethod,
    config: &AggregationConfig,
) -> Result<Vec<ScoredItem>>
where
    L: AsRef<[ScoredItem]>,
{
    if initial.is_empty() {
        return Ok(Vec::new());
    }
    if method == AggregationMethod::Default {
        return Ok(initial.to_vec());
    }

    let mut aggregate = RankingIndex::from_items(initial)?;
    let rankers = inputs
        .iter()
        .map(|input| RankingIndex::from_items(input.as_ref()))
        .collect::<Result<Vec<_>>>()?;

    debug!(
        method = %method,
        rankers = rankers.len(),
        items = aggregate.len(),
        "aggregating"
    );

    match method {
        AggregationMethod::Default => {}
        AggregationMethod::AdjacentPairs => {
            adjacent::adjacent_pairs(&rankers, &mut aggregate, config.passes);
        }
        AggregationMethod::CombMnz => {
            comb_mnz::comb_mnz(&rankers, &mut aggregate);
        }
        AggregationMethod::LocalKemenization => {
            kemeny::local_kemenization(&rankers, &mut aggregate);
        }
        AggregationMethod::SupervisedLocalKemenization => {
            let weights = config
                .weights
                .as_ref()
                .ok_or(AggregationError::MissingWeights)?;
            weights.check_len(rankers.len())?;
            kemeny::supervised_local_kemenization(&rankers, &mut aggregate, weights);
        }
    }

    if method.uses_scores() {
        return Ok(aggregate.materialize_by_score());
    }
    if method.is_rank_based() {
        aggregate.reset_scores_to_sentinel();
    }
    Ok(aggregate.materialize_by_rank())
}

// ─────────────────────────────────────────────────────────────────────────────
// Prelude
// ─────────────────────────────────────────────────────────────────────────────

/// Prelude for common imports.
///
/// ```rust
/// use concord::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        aggregate, aggregate_packed, aggregate_weighted, aggregate_with_config, kendall_distance,
        mean_distance,
    };
    pub use crate::{
        AggregationConfig, AggregationError, AggregationMethod, RankingIndex, Result, ScoredItem,
        Weights, NOT_APPLICABLE_SCORE,
    };
}
