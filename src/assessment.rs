//! Output envelope for one triage assessment: band + score + the
//! explainability the UI renders (ranked contributors, warnings,
//! velocity flag). This is the shape the API returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{RankedContributor, ScoreResult};
use crate::thresholds::RiskBand;

/// A human-readable note attached to an assessment (explainability).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    /// Readable description (e.g. "weights sum to 110 instead of 100").
    pub message: String,
    /// Coarse category, for consistent UI grouping and tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReasonKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    WeightTotal,
    OutOfRange,
    Ranking,
    Velocity,
}

impl Reason {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }

    pub fn kind(mut self, kind: ReasonKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Complete assessment including explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub band: RiskBand,
    pub total_score: i32,
    /// Full per-signal breakdown.
    pub score: ScoreResult,
    /// Ranked top contributors (typically 3).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_contributors: Vec<RankedContributor>,
    /// Warnings and notes; empty for a clean computation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<Reason>,
    /// Present only when a previous score was available to compare.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_alert: Option<bool>,
    pub ts: DateTime<Utc>,
}

impl Assessment {
    pub fn new(band: RiskBand, score: ScoreResult) -> Self {
        Self {
            band,
            total_score: score.total_score,
            score,
            top_contributors: Vec::new(),
            reasons: Vec::new(),
            velocity_alert: None,
            ts: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: Reason) -> Self {
        self.reasons.push(reason);
        self
    }

    pub fn with_contributors(mut self, contributors: Vec<RankedContributor>) -> Self {
        self.top_contributors = contributors;
        self
    }

    pub fn with_velocity_alert(mut self, alert: bool) -> Self {
        self.velocity_alert = Some(alert);
        self
    }
}
