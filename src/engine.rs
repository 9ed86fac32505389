//! # Assessment Engine
//! Pure, testable logic that maps `(signals, weights, thresholds,
//! previous score)` → `Assessment`. No I/O, suitable for unit tests
//! and offline evaluation.
//!
//! Policy: compute the weighted score, classify it, rank the top
//! contributors, and attach every warning the inputs earn (off-100
//! weight total, out-of-range normalized values, zero-total ranking,
//! velocity alert). Warnings never block the score.

use tracing::warn;

use crate::assessment::{Assessment, Reason, ReasonKind};
use crate::error::ScoreError;
use crate::scoring::{compute_score, top_contributors};
use crate::signal::Signal;
use crate::thresholds::Thresholds;
use crate::weights::WeightSet;

/// How many ranked contributors the envelope carries.
const TOP_N: usize = 3;

/// Same logic as the `/score` handler but purely functional for testing.
pub fn assess(
    signals: &[Signal],
    weights: &WeightSet,
    thresholds: &Thresholds,
    previous_score: Option<i32>,
) -> Assessment {
    let result = compute_score(signals, weights);
    let band = thresholds.classify(result.total_score);
    let ranked = top_contributors(&result, TOP_N);

    let mut assessment = Assessment::new(band, result).with_contributors(ranked);

    // 1) Weight-sum validation: detection only, never a blocker.
    if let Err(e @ ScoreError::InvalidWeightTotal { sum }) = weights.validate() {
        warn!(sum, "weight total off 100, score computed with supplied weights");
        assessment =
            assessment.with_reason(Reason::new(e.to_string()).kind(ReasonKind::WeightTotal));
    }

    // 2) Flag normalized values outside 0-100 (uncapped rules fed
    //    out-of-range raw input). Flagged, not corrected.
    let out_of_range: Vec<Reason> = assessment
        .score
        .per_signal_normalized
        .iter()
        .filter(|(_, norm)| !(0.0..=100.0).contains(*norm))
        .map(|(key, norm)| {
            Reason::new(format!(
                "{key}: normalized value {norm:.1} outside 0-100, raw input outside native range"
            ))
            .kind(ReasonKind::OutOfRange)
        })
        .collect();
    for reason in out_of_range {
        assessment = assessment.with_reason(reason);
    }

    // 3) Zero-total ranking has no defined percentage shares.
    if assessment.total_score == 0 && !assessment.top_contributors.is_empty() {
        assessment = assessment.with_reason(
            Reason::new("total score is 0; contribution shares reported as 0%")
                .kind(ReasonKind::Ranking),
        );
    }

    // 4) Velocity alert, only when a previous score exists.
    if let Some(prev) = previous_score {
        let current = assessment.total_score;
        let alert = thresholds.is_velocity_alert(prev, current);
        if alert {
            assessment = assessment.with_reason(
                Reason::new(format!(
                    "score rose from {prev} to {current} (more than +{} within the window)",
                    thresholds.velocity_delta
                ))
                .kind(ReasonKind::Velocity),
            );
        }
        assessment = assessment.with_velocity_alert(alert);
    }

    assessment
}
