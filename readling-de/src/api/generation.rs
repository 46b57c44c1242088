//! Story generation endpoint

use crate::error::{EngineError, EngineResult};
use crate::generation::StoryProcessor;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use readling_common::story::{GeneratedStory, PhonicsFingerprint};

/// `POST /generate` - run the regeneration loop for a learner fingerprint.
///
/// Returns the accepted story, or a typed failure: 422 when the attempt
/// budget is exhausted below threshold, 502 when the collaborator is down,
/// 500 when no generator is configured.
pub async fn generate_story(
    State(state): State<AppState>,
    Json(fingerprint): Json<PhonicsFingerprint>,
) -> EngineResult<Json<GeneratedStory>> {
    let Some(generator) = state.generator.clone() else {
        return Err(EngineError::Config(
            "story generation disabled: no generator API key configured".to_string(),
        ));
    };

    let processor = StoryProcessor::new(
        state.scorer.clone(),
        generator,
        state.config.max_regeneration_attempts,
        state.config.attempt_timeout(),
    );

    let story = processor.generate_story(&fingerprint).await?;
    Ok(Json(story))
}
