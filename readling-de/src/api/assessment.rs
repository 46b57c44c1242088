//! Read-aloud assessment endpoint

use crate::assessment::assess;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use readling_common::assessment::{ReadAloudAssessment, SpokenWord};
use readling_common::gpc::{tokenize, Gpc};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    pub expected_text: String,
    /// Transcribed words from the ASR collaborator
    pub spoken_words: Vec<SpokenWord>,
    pub reading_time_ms: u64,
}

/// `POST /assess` - score one spoken attempt against expected page text.
pub async fn assess_reading(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Json<ReadAloudAssessment> {
    // Precompute the word→GPC map with the decomposer; the assessor itself
    // is a pure function over it.
    let decomposer = state.scorer.decomposer();
    let mut word_gpc_map: HashMap<String, Vec<Gpc>> = HashMap::new();
    for word in tokenize(&request.expected_text) {
        word_gpc_map
            .entry(word.clone())
            .or_insert_with(|| decomposer.decompose(&word));
    }

    Json(assess(
        &request.expected_text,
        &request.spoken_words,
        request.reading_time_ms,
        &word_gpc_map,
    ))
}
