//! Named error taxonomy for the scoring core.
//!
//! Both variants are recoverable by design: an invalid weight total is
//! surfaced as a warning while computation proceeds with the supplied
//! weights, and a zero-total ranking falls back to 0% shares instead
//! of propagating NaN.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScoreError {
    /// Supplied weights do not sum to 100 percentage points.
    #[error("weights sum to {sum} instead of 100")]
    InvalidWeightTotal { sum: f32 },

    /// Percentage-of-total requested while the total score is zero.
    #[error("percentage share of a zero total is not computable")]
    NotComputable,
}
