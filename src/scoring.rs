//! # Risk Score Core
//!
//! Pure weighted-sum scoring: normalize each signal onto 0-100, scale
//! by its weight (percentage points), sum, round. No I/O, no hidden
//! state; calling twice with identical inputs yields identical
//! results.
//!
//! Pairing policy: a signal contributes only when it appears in BOTH
//! the signal list and the weight set. A signal without a weight, or a
//! weight without a signal, is silently excluded from the sum. That is
//! a deliberate policy, not an omission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::ScoreError;
use crate::signal::{normalize, Signal, SignalKind};
use crate::weights::WeightSet;

/// Derived output of one scoring pass. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Normalized (0-100 scale) value per contributing signal.
    pub per_signal_normalized: BTreeMap<SignalKind, f32>,
    /// Weighted point contribution per contributing signal.
    pub per_signal_contribution: BTreeMap<SignalKind, f32>,
    /// Sum of contributions, rounded to the nearest integer.
    pub total_score: i32,
}

/// One entry of the contribution ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContributor {
    pub key: SignalKind,
    pub contribution: f32,
    /// Rounded share of the total; 0 when the total itself is zero
    /// (the share is then not computable, see `percentage_share`).
    pub percentage_of_total: i32,
}

/// Weighted point contribution of one normalized value.
/// The weight is a percentage (0-100 scale), not a fraction.
pub fn contribution(normalized: f32, weight: f32) -> f32 {
    normalized * weight / 100.0
}

/// Compute the composite score for every signal present in both inputs.
///
/// Duplicate keys in `signals` resolve to the last occurrence. Empty
/// input (or no overlap between signals and weights) yields a total of
/// zero, not an error.
pub fn compute_score(signals: &[Signal], weights: &WeightSet) -> ScoreResult {
    let mut per_signal_normalized = BTreeMap::new();
    let mut per_signal_contribution = BTreeMap::new();

    for signal in signals {
        let Some(weight) = weights.get(signal.key) else {
            debug!(signal = %signal.key, "signal has no weight, excluded from sum");
            continue;
        };
        let norm = normalize(signal);
        per_signal_normalized.insert(signal.key, norm);
        per_signal_contribution.insert(signal.key, contribution(norm, weight));
    }

    let total: f32 = per_signal_contribution.values().sum();

    ScoreResult {
        per_signal_normalized,
        per_signal_contribution,
        total_score: total.round() as i32,
    }
}

/// Rounded percentage share of one contribution against the total.
///
/// A zero total has no defined shares; callers pick the documented
/// fallback (the ranking uses 0%) instead of letting NaN through.
pub fn percentage_share(contribution: f32, total_score: i32) -> Result<i32, ScoreError> {
    if total_score == 0 {
        return Err(ScoreError::NotComputable);
    }
    Ok((contribution / total_score as f32 * 100.0).round() as i32)
}

/// Rank signals by contribution, descending, and take the first `n`.
///
/// Ties break by signal key ascending (lexicographic) so the ranking
/// is deterministic. When the total is zero every share falls back to
/// 0%.
pub fn top_contributors(result: &ScoreResult, n: usize) -> Vec<RankedContributor> {
    let mut ranked: Vec<(SignalKind, f32)> = result
        .per_signal_contribution
        .iter()
        .map(|(k, c)| (*k, *c))
        .collect();
    // Descending by contribution; BTreeMap iteration already yields
    // ascending keys, and the stable sort preserves that for ties.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .take(n)
        .map(|(key, c)| RankedContributor {
            key,
            contribution: c,
            percentage_of_total: percentage_share(c, result.total_score).unwrap_or(0),
        })
        .collect()
}
