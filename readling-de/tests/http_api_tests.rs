//! HTTP surface tests
//!
//! Exercises the axum router in-process with `tower::ServiceExt::oneshot`;
//! no sockets, no generator credentials.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use readling_common::gpc::{GpcInventory, TrickyWords};
use readling_de::validators::DecodabilityScorer;
use readling_de::{build_router, AppState, EngineConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> AppState {
    let scorer = Arc::new(DecodabilityScorer::new(
        Arc::new(GpcInventory::letters_and_sounds()),
        TrickyWords::default_set(),
    ));
    AppState::new(scorer, None, Arc::new(EngineConfig::default()))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_service_identity() {
    let app = build_router(test_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "readling-de");
    assert_eq!(body["generation_enabled"], false);
}

#[tokio::test]
async fn decompose_returns_the_gpc_breakdown() {
    let app = build_router(test_state());
    let response = app
        .oneshot(post_json("/decompose", json!({ "word": "make" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let graphemes: Vec<&str> = body["gpcs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["grapheme"].as_str().unwrap())
        .collect();
    assert_eq!(graphemes, vec!["m", "a_e", "k"]);
}

#[tokio::test]
async fn validate_scores_a_text_round_trip() {
    let app = build_router(test_state());
    let response = app
        .oneshot(post_json(
            "/validate",
            json!({
                "text": "sat pit quiz",
                "taught_graphemes": ["s", "a", "t", "p", "i", "n"],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["total_words"], 3);
    assert_eq!(body["decodable_words"], 2);
    assert_eq!(body["passes_threshold"], false);
    assert_eq!(body["undecodable_words"], json!(["quiz"]));
}

#[tokio::test]
async fn validate_accepts_a_per_request_threshold() {
    let app = build_router(test_state());
    let response = app
        .oneshot(post_json(
            "/validate",
            json!({
                "text": "sat pit quiz",
                "taught_graphemes": ["s", "a", "t", "p", "i", "n"],
                "threshold": 0.5,
            }),
        ))
        .await
        .unwrap();

    let body = response_json(response).await;
    assert_eq!(body["passes_threshold"], true);
}

#[tokio::test]
async fn assess_scores_a_spoken_attempt() {
    let app = build_router(test_state());
    let response = app
        .oneshot(post_json(
            "/assess",
            json!({
                "expected_text": "the cat sat",
                "spoken_words": [
                    { "word": "the", "confidence": 0.9, "timestamp_ms": 0 },
                    { "word": "big", "confidence": 0.8, "timestamp_ms": 600 },
                    { "word": "sat", "confidence": 0.95, "timestamp_ms": 1200 },
                ],
                "reading_time_ms": 60000,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["wcpm"], 2);
    let kinds: Vec<&str> = body["words"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["match", "substitution", "match"]);
}

#[tokio::test]
async fn generate_without_a_configured_generator_is_a_config_error() {
    let app = build_router(test_state());
    let response = app
        .oneshot(post_json(
            "/generate",
            json!({
                "phase": 2,
                "taught_graphemes": ["s", "a", "t", "p", "i", "n"],
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["error"]["code"], "CONFIG_ERROR");
}
