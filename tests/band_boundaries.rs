// tests/band_boundaries.rs
//
// Boundary tests for STABLE/WATCH/ACT_NOW via the public /classify
// endpoint. Lower bounds are inclusive: 60 is WATCH, 80 is ACT_NOW.

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use http::StatusCode;
use serde::Deserialize;
use tower::ServiceExt; // for `oneshot`

use triage_risk_engine::create_router;

#[derive(Debug, Deserialize)]
struct ClassifyResp {
    score: i32,
    band: String,
}

async fn call_classify(score: i32) -> (StatusCode, ClassifyResp) {
    let router = create_router();

    let req = Request::builder()
        .method("GET")
        .uri(format!("/classify?score={score}"))
        .body(Body::empty())
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    let body: ClassifyResp = serde_json::from_slice(&bytes).expect("invalid /classify body");
    (status, body)
}

#[tokio::test]
async fn stable_below_watch_floor() {
    let (status, body) = call_classify(59).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.band, "STABLE");
    assert_eq!(body.score, 59);
}

#[tokio::test]
async fn watch_floor_is_inclusive() {
    let (_, body) = call_classify(60).await;
    assert_eq!(body.band, "WATCH");
}

#[tokio::test]
async fn watch_ceiling_stays_watch() {
    let (_, body) = call_classify(79).await;
    assert_eq!(body.band, "WATCH");
}

#[tokio::test]
async fn act_now_floor_is_inclusive() {
    let (_, body) = call_classify(80).await;
    assert_eq!(body.band, "ACT_NOW");
}

#[tokio::test]
async fn extremes_classify_cleanly() {
    let (_, low) = call_classify(0).await;
    assert_eq!(low.band, "STABLE");
    let (_, high) = call_classify(100).await;
    assert_eq!(high.band, "ACT_NOW");
}
