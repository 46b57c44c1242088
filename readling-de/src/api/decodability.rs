//! Decomposition and validation endpoints

use crate::validators::grapheme_set;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use readling_common::decodability::DecodabilityReport;
use readling_common::gpc::Gpc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DecomposeRequest {
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct DecomposeResponse {
    pub word: String,
    pub gpcs: Vec<Gpc>,
}

/// `POST /decompose` - break a single word into inventory correspondences.
pub async fn decompose_word(
    State(state): State<AppState>,
    Json(request): Json<DecomposeRequest>,
) -> Json<DecomposeResponse> {
    let gpcs = state.scorer.decomposer().decompose(&request.word);
    Json(DecomposeResponse {
        word: request.word,
        gpcs,
    })
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub text: String,
    pub taught_graphemes: Vec<String>,
    #[serde(default)]
    pub target_graphemes: Vec<String>,
    /// Overrides the service's configured threshold for this call
    #[serde(default)]
    pub threshold: Option<f32>,
}

/// `POST /validate` - score a text against a taught/target grapheme set.
pub async fn validate_text(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Json<DecodabilityReport> {
    let taught = grapheme_set(&request.taught_graphemes);
    let target = grapheme_set(&request.target_graphemes);
    let report = match request.threshold {
        Some(threshold) => state.scorer.validate_story_with_threshold(
            &request.text,
            &taught,
            &target,
            threshold.clamp(0.0, 1.0),
        ),
        None => state.scorer.validate_story(&request.text, &taught, &target),
    };
    Json(report)
}
