//! Checks on aggregated output.
//!
//! Every method returns a permutation of its initial aggregate. Rank-based
//! methods additionally mark every score as not applicable, and `CombMNZ`
//! returns scores in `[0, 1]`, highest first. These helpers check those
//! properties and collect every violation instead of stopping at the first.

use std::collections::{HashMap, HashSet};

use crate::{AggregationMethod, ScoredItem, NOT_APPLICABLE_SCORE};

/// Outcome of a validation check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// Whether every check passed.
    pub is_valid: bool,
    /// One message per violation.
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Fold another result into this one.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self
    }
}

/// No id appears twice.
#[must_use]
pub fn validate_no_duplicates(output: &[ScoredItem]) -> ValidationResult {
    let mut seen = HashSet::with_capacity(output.len());
    let errors = output
        .iter()
        .filter(|item| !seen.insert(item.id.as_str()))
        .map(|item| format!("duplicate id {:?}", item.id))
        .collect();
    ValidationResult::from_errors(errors)
}

/// `output` holds exactly the ids of `initial`, each once.
#[must_use]
pub fn validate_permutation(initial: &[ScoredItem], output: &[ScoredItem]) -> ValidationResult {
    let mut errors = Vec::new();
    if initial.len() != output.len() {
        errors.push(format!(
            "length changed: {} in, {} out",
            initial.len(),
            output.len()
        ));
    }

    let mut counts: HashMap<&str, i64> = HashMap::with_capacity(initial.len());
    for item in initial {
        *counts.entry(item.id.as_str()).or_default() += 1;
    }
    for item in output {
        *counts.entry(item.id.as_str()).or_default() -= 1;
    }

    let mut unbalanced: Vec<_> = counts.into_iter().filter(|&(_, c)| c != 0).collect();
    unbalanced.sort_unstable();
    for (id, c) in unbalanced {
        if c > 0 {
            errors.push(format!("id {id:?} missing from output"));
        } else {
            errors.push(format!("id {id:?} not in initial aggregate"));
        }
    }

    ValidationResult::from_errors(errors)
}

/// Every score is [`NOT_APPLICABLE_SCORE`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn validate_not_applicable_scores(output: &[ScoredItem]) -> ValidationResult {
    let errors = output
        .iter()
        .filter(|item| item.score != NOT_APPLICABLE_SCORE)
        .map(|item| {
            format!(
                "id {:?} has score {}, expected {NOT_APPLICABLE_SCORE}",
                item.id, item.score
            )
        })
        .collect();
    ValidationResult::from_errors(errors)
}

/// Every score is finite and within `[lo, hi]`.
#[must_use]
pub fn validate_bounds(output: &[ScoredItem], lo: f32, hi: f32) -> ValidationResult {
    let errors = output
        .iter()
        .filter(|item| !item.score.is_finite() || item.score < lo || item.score > hi)
        .map(|item| format!("id {:?} score {} outside [{lo}, {hi}]", item.id, item.score))
        .collect();
    ValidationResult::from_errors(errors)
}

/// Scores never increase down the list.
#[must_use]
pub fn validate_sorted_desc(output: &[ScoredItem]) -> ValidationResult {
    let errors = output
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].score < w[1].score)
        .map(|(i, w)| {
            format!(
                "position {i} ({}) scores {} below position {} ({}) at {}",
                w[0].id,
                w[0].score,
                i + 1,
                w[1].id,
                w[1].score
            )
        })
        .collect();
    ValidationResult::from_errors(errors)
}

/// All checks that apply to `method`'s output for `initial`.
#[must_use]
pub fn validate(
    method: AggregationMethod,
    initial: &[ScoredItem],
    output: &[ScoredItem],
) -> ValidationResult {
    let base = validate_permutation(initial, output).merge(validate_no_duplicates(output));
    match method {
        AggregationMethod::Default => base,
        AggregationMethod::CombMnz => base
            .merge(validate_bounds(output, 0.0, 1.0))
            .merge(validate_sorted_desc(output)),
        AggregationMethod::AdjacentPairs
        | AggregationMethod::LocalKemenization
        | AggregationMethod::SupervisedLocalKemenization => {
            base.merge(validate_not_applicable_scores(output))
        }
    }
}
