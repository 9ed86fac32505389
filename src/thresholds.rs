//! # Triage Thresholds
//!
//! Band classification and the velocity alert. The three tunable
//! constants live in one config struct: the WATCH and ACT NOW band
//! floors and the velocity delta. Both band floors are inclusive
//! lower bounds (a score of exactly 80 is ACT NOW, exactly 60 is
//! WATCH); the velocity alert requires a strictly greater rise.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

/// Triage band for a composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    Stable,
    Watch,
    ActNow,
}

impl RiskBand {
    /// Label as it appears on the wire and in metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskBand::Stable => "STABLE",
            RiskBand::Watch => "WATCH",
            RiskBand::ActNow => "ACT_NOW",
        }
    }
}

/// Classification thresholds, loadable from JSON config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    /// Inclusive floor of the WATCH band.
    pub watch_threshold: i32,
    /// Inclusive floor of the ACT NOW band.
    pub act_now_threshold: i32,
    /// A rise strictly greater than this triggers a velocity alert.
    pub velocity_delta: i32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            watch_threshold: 60,
            act_now_threshold: 80,
            velocity_delta: 15,
        }
    }
}

impl Thresholds {
    /// Load from a JSON file; falls back to defaults on any error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path.as_ref()) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(t) => t,
                Err(e) => {
                    debug!(path = %path.as_ref().display(), error = %e, "thresholds config malformed, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                debug!(path = %path.as_ref().display(), error = %e, "thresholds config not loaded, using defaults");
                Self::default()
            }
        }
    }

    /// Map a total score onto its band. Lower bounds inclusive.
    pub fn classify(&self, total_score: i32) -> RiskBand {
        if total_score >= self.act_now_threshold {
            RiskBand::ActNow
        } else if total_score >= self.watch_threshold {
            RiskBand::Watch
        } else {
            RiskBand::Stable
        }
    }

    /// True iff the score rose strictly more than `velocity_delta`.
    /// Independent of the band: a STABLE score can still alert.
    pub fn is_velocity_alert(&self, previous_score: i32, current_score: i32) -> bool {
        current_score - previous_score > self.velocity_delta
    }
}
