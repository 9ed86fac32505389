use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::assessment::Assessment;
use crate::engine;
use crate::history::History;
use crate::metrics;
use crate::signal::{Signal, SignalKind};
use crate::thresholds::Thresholds;
use crate::trend::{TrendDirection, TrendWindow};
use crate::weights::{HotReloadWeights, WeightSet};

#[derive(Clone)]
pub struct AppState {
    weights: Arc<HotReloadWeights>,
    thresholds: Thresholds,
    history: Arc<History>,
    trend: Arc<TrendWindow>,
}

fn weights_path() -> PathBuf {
    std::env::var("WEIGHTS_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/weights.json"))
}

fn thresholds_path() -> PathBuf {
    std::env::var("THRESHOLDS_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/thresholds.json"))
}

pub fn create_router() -> Router {
    let state = AppState {
        weights: Arc::new(HotReloadWeights::new(Some(&weights_path()))),
        thresholds: Thresholds::load_from_file(thresholds_path()),
        history: Arc::new(History::with_capacity(2000)),
        trend: Arc::new(TrendWindow::new_14d()),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/score", post(score))
        .route("/classify", get(classify))
        .route("/debug/trend", get(debug_trend))
        .route("/debug/history", get(debug_history))
        .route("/debug/weights", get(debug_weights))
        .route("/admin/reload-weights", get(admin_reload_weights))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreReq {
    /// Raw signal values keyed by wire name; unknown keys are ignored.
    signals: HashMap<String, f32>,
    /// Optional per-request override of the configured weights.
    #[serde(default)]
    weights: Option<HashMap<String, f32>>,
    /// Previous total score for the velocity check. When absent the
    /// most recent history entry is used; when neither exists the
    /// velocity flag is omitted.
    #[serde(default)]
    previous_score: Option<i32>,
}

async fn score(State(state): State<AppState>, Json(body): Json<ScoreReq>) -> Json<Assessment> {
    let weights = match &body.weights {
        Some(raw) => WeightSet::from_pairs(raw.iter().map(|(k, v)| (k.as_str(), *v))),
        None => state.weights.current(),
    };

    // Unknown keys drop out here (policy: excluded, not an error).
    let signals: Vec<Signal> = body
        .signals
        .iter()
        .filter_map(|(key, raw)| SignalKind::from_key(key).map(|k| Signal::new(k, *raw)))
        .collect();

    let previous = body.previous_score.or_else(|| state.history.last_score());
    let assessment = engine::assess(&signals, &weights, &state.thresholds, previous);

    metrics::record_score_request(assessment.band.as_str());
    if assessment.velocity_alert == Some(true) {
        metrics::record_velocity_alert();
    }

    state.trend.record(assessment.total_score, None);
    state.history.push(&assessment);

    Json(assessment)
}

#[derive(serde::Deserialize)]
struct ClassifyQuery {
    score: i32,
}

#[derive(serde::Serialize)]
struct ClassifyResp {
    score: i32,
    band: crate::thresholds::RiskBand,
}

async fn classify(
    State(state): State<AppState>,
    Query(q): Query<ClassifyQuery>,
) -> Json<ClassifyResp> {
    Json(ClassifyResp {
        score: q.score,
        band: state.thresholds.classify(q.score),
    })
}

#[derive(serde::Serialize)]
struct TrendInfo {
    window_secs: u64,
    average: f32,
    count: usize,
    direction: TrendDirection,
}

async fn debug_trend(State(state): State<AppState>) -> Json<TrendInfo> {
    let summary = state.trend.summary();
    Json(TrendInfo {
        window_secs: state.trend.window_secs(),
        average: summary.average,
        count: summary.count,
        direction: summary.direction,
    })
}

#[derive(serde::Serialize)]
struct HistoryOut {
    ts_unix: u64,
    band: String,
    total_score: i32,
    top_signals: Vec<String>,
    top_contributions: Vec<f32>,
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryOut>> {
    let rows = state.history.snapshot_last_n(10);
    let out = rows
        .into_iter()
        .map(|h| HistoryOut {
            ts_unix: h.ts_unix,
            band: h.band.as_str().to_string(),
            total_score: h.total_score,
            top_signals: h.top_signals.iter().map(|k| k.to_string()).collect(),
            top_contributions: h.top_contributions,
        })
        .collect::<Vec<_>>();
    Json(out)
}

async fn debug_weights(State(state): State<AppState>) -> Json<WeightSet> {
    Json(state.weights.current())
}

async fn admin_reload_weights(State(state): State<AppState>) -> String {
    let ws = state.weights.reload();
    format!("reloaded, total={:.1}", ws.total())
}
