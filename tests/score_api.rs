// tests/score_api.rs
//
// End-to-end tests for POST /score: the reference scenario, weight
// overrides, the InvalidWeightTotal warning path, unknown-key
// exclusion, and the history-backed velocity alert.

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use triage_risk_engine::create_router;

async fn post_score(router: &axum::Router, payload: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/score")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).expect("invalid /score body");
    (status, body)
}

fn reference_signals() -> Value {
    json!({
        "phq9": 18,
        "gad7": 12,
        "sentiment": -0.4,
        "latency": 2.1,
        "engagement": 55,
        "keywords": 45,
        "noShow": 35
    })
}

#[tokio::test]
async fn reference_scenario_scores_and_classifies() {
    let router = create_router();
    let (status, body) = post_score(&router, json!({ "signals": reference_signals() })).await;

    assert_eq!(status, StatusCode::OK);
    // Sum of default-weighted contributions:
    // 16.67 + 8.57 + 14.0 + 10.5 + 5.5 + 4.5 + 1.75 ≈ 61.5 → 61
    assert_eq!(body["totalScore"], json!(61));
    assert_eq!(body["band"], json!("WATCH"));
    assert_eq!(body["topContributors"].as_array().unwrap().len(), 3);
    assert_eq!(body["topContributors"][0]["key"], json!("phq9"));
    // Clean inputs: no warnings
    assert!(body.get("reasons").is_none());
}

#[tokio::test]
async fn weight_override_with_bad_total_warns_but_scores() {
    let router = create_router();
    let (status, body) = post_score(
        &router,
        json!({
            "signals": { "phq9": 18, "gad7": 12 },
            "weights": { "phq9": 50, "gad7": 60 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["totalScore"].is_number());
    let reasons = body["reasons"].as_array().expect("warning expected");
    assert!(reasons
        .iter()
        .any(|r| r["kind"] == json!("weight_total")));
}

#[tokio::test]
async fn unknown_signal_keys_are_silently_excluded() {
    let router = create_router();
    let (status, body) = post_score(
        &router,
        json!({
            "signals": { "phq9": 27, "heartRate": 180 },
            "weights": { "phq9": 100, "bloodPressure": 40 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalScore"], json!(100));
    let contributions = body["score"]["perSignalContribution"].as_object().unwrap();
    assert_eq!(contributions.len(), 1);
    assert!(contributions.contains_key("phq9"));
}

#[tokio::test]
async fn caller_previous_score_drives_velocity_alert() {
    let router = create_router();
    let (_, body) = post_score(
        &router,
        json!({ "signals": reference_signals(), "previousScore": 45 }),
    )
    .await;
    // 45 → 61 is +16, strictly greater than 15
    assert_eq!(body["velocityAlert"], json!(true));

    let (_, body) = post_score(
        &router,
        json!({ "signals": reference_signals(), "previousScore": 46 }),
    )
    .await;
    // +15 exactly: not an alert
    assert_eq!(body["velocityAlert"], json!(false));
}

#[tokio::test]
async fn history_supplies_previous_score_when_omitted() {
    let router = create_router();

    // First request: empty history, no velocity flag at all.
    let (_, first) = post_score(
        &router,
        json!({ "signals": { "phq9": 10 }, "weights": { "phq9": 100 } }),
    )
    .await;
    assert!(first.get("velocityAlert").is_none());
    let first_score = first["totalScore"].as_i64().unwrap();

    // Second request jumps well past the velocity delta.
    let (_, second) = post_score(
        &router,
        json!({ "signals": { "phq9": 25 }, "weights": { "phq9": 100 } }),
    )
    .await;
    let second_score = second["totalScore"].as_i64().unwrap();
    assert!(second_score - first_score > 15);
    assert_eq!(second["velocityAlert"], json!(true));
}

#[tokio::test]
async fn zero_total_reports_zero_shares_not_nan() {
    let router = create_router();
    let (status, body) = post_score(
        &router,
        json!({ "signals": { "phq9": 0 }, "weights": { "phq9": 100 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalScore"], json!(0));
    assert_eq!(body["band"], json!("STABLE"));
    assert_eq!(body["topContributors"][0]["percentageOfTotal"], json!(0));
    let reasons = body["reasons"].as_array().unwrap();
    assert!(reasons.iter().any(|r| r["kind"] == json!("ranking")));
}

#[tokio::test]
async fn debug_endpoints_reflect_scored_requests() {
    let router = create_router();
    let _ = post_score(&router, json!({ "signals": reference_signals() })).await;

    let req = Request::builder()
        .method("GET")
        .uri("/debug/history")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    let rows: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["total_score"], json!(61));

    let req = Request::builder()
        .method("GET")
        .uri("/debug/trend")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    let trend: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(trend["count"], json!(1));
    // a single scored request cannot show a slope yet
    assert_eq!(trend["direction"], json!("flat"));
}
