//! # Signals
//!
//! The closed set of risk signals and their normalization rules.
//!
//! Each signal arrives on its own native scale (questionnaire points,
//! velocity in -1..+1, z-score sigma units, plain percentages) and is
//! mapped onto a common 0-100 scale where higher always means higher
//! assessed risk. The rules live in a lookup table keyed by signal,
//! so adding a signal means adding one row, not another branch.
//!
//! Only `latency` caps its normalized value (at 100). The other rules
//! are deliberately unclamped, matching the reference behavior:
//! out-of-range raw input (e.g. phq9 = 40 on a 0-27 scale) produces a
//! normalized value outside 0-100 and can dominate the total. That is
//! a known inconsistency; `normalize` logs a warning when it happens
//! so the condition is visible without being altered.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Wire identifiers for the seven known signals.
///
/// Declared in lexicographic key order; the derived `Ord` doubles as
/// the deterministic tie-break when ranking contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    #[serde(rename = "engagement")]
    Engagement,
    #[serde(rename = "gad7")]
    Gad7,
    #[serde(rename = "keywords")]
    Keywords,
    #[serde(rename = "latency")]
    Latency,
    #[serde(rename = "noShow")]
    NoShow,
    #[serde(rename = "phq9")]
    Phq9,
    #[serde(rename = "sentiment")]
    Sentiment,
}

impl SignalKind {
    /// All known signals, in tie-break (lexicographic key) order.
    pub const ALL: [SignalKind; 7] = [
        SignalKind::Engagement,
        SignalKind::Gad7,
        SignalKind::Keywords,
        SignalKind::Latency,
        SignalKind::NoShow,
        SignalKind::Phq9,
        SignalKind::Sentiment,
    ];

    /// Wire key as it appears in payloads and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKind::Engagement => "engagement",
            SignalKind::Gad7 => "gad7",
            SignalKind::Keywords => "keywords",
            SignalKind::Latency => "latency",
            SignalKind::NoShow => "noShow",
            SignalKind::Phq9 => "phq9",
            SignalKind::Sentiment => "sentiment",
        }
    }

    /// Resolve a wire key; `None` for anything outside the registry.
    /// Callers drop unknown keys (policy: excluded, not an error).
    pub fn from_key(key: &str) -> Option<SignalKind> {
        SignalKind::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw measurement for one signal, on that signal's native scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub key: SignalKind,
    pub raw_value: f32,
}

impl Signal {
    pub fn new(key: SignalKind, raw_value: f32) -> Self {
        Self { key, raw_value }
    }
}

type NormalizeFn = fn(f32) -> f32;

/// Registry of normalization rules, one per signal.
static RULES: Lazy<BTreeMap<SignalKind, NormalizeFn>> = Lazy::new(|| {
    let mut m = BTreeMap::new();
    m.insert(SignalKind::Phq9, norm_phq9 as NormalizeFn);
    m.insert(SignalKind::Gad7, norm_gad7 as NormalizeFn);
    m.insert(SignalKind::Sentiment, norm_sentiment as NormalizeFn);
    m.insert(SignalKind::Latency, norm_latency as NormalizeFn);
    m.insert(SignalKind::Engagement, norm_identity as NormalizeFn);
    m.insert(SignalKind::Keywords, norm_identity as NormalizeFn);
    m.insert(SignalKind::NoShow, norm_identity as NormalizeFn);
    m
});

/// PHQ-9 depression screen, native 0-27.
fn norm_phq9(raw: f32) -> f32 {
    raw / 27.0 * 100.0
}

/// GAD-7 anxiety screen, native 0-21.
fn norm_gad7(raw: f32) -> f32 {
    raw / 21.0 * 100.0
}

/// Sentiment velocity, native -1..+1. Inverted: decline = higher risk,
/// so raw +1 normalizes to 0 and raw -1 to 100.
fn norm_sentiment(raw: f32) -> f32 {
    ((raw * -1.0) + 1.0) / 2.0 * 100.0
}

/// Response-latency z-score, unbounded. Scaled against 3 sigma and
/// capped at 100 (the only capped rule).
fn norm_latency(raw: f32) -> f32 {
    (raw / 3.0 * 100.0).min(100.0)
}

/// Signals already expressed as 0-100 percentages.
fn norm_identity(raw: f32) -> f32 {
    raw
}

/// Apply a signal's normalization rule.
///
/// Pure apart from a warning log when the result leaves [0,100],
/// which can only happen for out-of-range raw input on an uncapped
/// rule.
pub fn normalize(signal: &Signal) -> f32 {
    let rule = RULES
        .get(&signal.key)
        .copied()
        .unwrap_or(norm_identity as NormalizeFn);
    let v = rule(signal.raw_value);
    if !(0.0..=100.0).contains(&v) {
        warn!(
            signal = %signal.key,
            raw = signal.raw_value,
            normalized = v,
            "normalized value outside 0-100 (raw input outside native range)"
        );
    }
    v
}
