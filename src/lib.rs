// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod assessment;
pub mod engine;
pub mod error;
pub mod history;
pub mod metrics;
pub mod scoring;
pub mod signal;
pub mod thresholds;
pub mod trend;
pub mod weights;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::assessment::{Assessment, Reason, ReasonKind};
pub use crate::engine::assess;
pub use crate::error::ScoreError;
pub use crate::scoring::{compute_score, contribution, top_contributors, RankedContributor, ScoreResult};
pub use crate::signal::{normalize, Signal, SignalKind};
pub use crate::thresholds::{RiskBand, Thresholds};
pub use crate::trend::{TrendDirection, TrendSummary, TrendWindow};
pub use crate::weights::{HotReloadWeights, WeightSet};
