//! Story Processor - bounded generate-validate-regenerate loop
//!
//! A retry state machine: `Attempting(n)` transitions to `Accepted` when a
//! draft passes the decodability threshold, or to `Exhausted` when the
//! attempt budget runs out. From attempt 2 onward the prompt carries the
//! previous attempt's undecodable words as an avoidance list; that list and
//! the accumulated cost are the only state threaded between attempts.
//!
//! Attempt accounting:
//! - A timed-out collaborator call consumes the attempt and counts as a
//!   failed validation (the previous avoidance list is carried forward).
//! - A collaborator error is fatal for its attempt; remaining attempts
//!   still run. If no attempt ever produced a validation report the
//!   collaborator failure is surfaced as-is.
//! - Cost is summed across every attempt that reached the collaborator,
//!   accepted or not.
//!
//! Cancellation is checked between attempts, never mid-attempt: the
//! collaborator call is atomic from this engine's perspective.

use crate::error::{EngineError, EngineResult};
use crate::generation::generator::{GeneratorError, StoryGenerator};
use crate::generation::prompt::{build_prompt, RegenerationContext};
use crate::validators::{grapheme_set, DecodabilityScorer};
use readling_common::decodability::DecodabilityReport;
use readling_common::story::{
    GeneratedStory, GenerationCost, PhonicsFingerprint, StoryMetadata, StoryPage,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use tracing::{debug, info, warn};

/// Progress events emitted while a story is generated.
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    AttemptStarted {
        attempt: u32,
        max_attempts: u32,
    },
    AttemptValidated {
        attempt: u32,
        token_score: f32,
        passes: bool,
    },
    AttemptFailed {
        attempt: u32,
        reason: String,
    },
    StoryAccepted {
        attempt: u32,
        story_id: Uuid,
    },
    Exhausted {
        attempts: u32,
    },
}

/// Orchestrates the regeneration loop for one learner fingerprint at a time.
///
/// Cheap to clone per story; independent stories run their loops fully in
/// parallel with no coordination.
#[derive(Clone)]
pub struct StoryProcessor {
    scorer: Arc<DecodabilityScorer>,
    generator: Arc<dyn StoryGenerator>,
    max_attempts: u32,
    attempt_timeout: std::time::Duration,
    event_tx: Option<mpsc::Sender<GenerationEvent>>,
    cancel: CancellationToken,
}

impl StoryProcessor {
    pub fn new(
        scorer: Arc<DecodabilityScorer>,
        generator: Arc<dyn StoryGenerator>,
        max_attempts: u32,
        attempt_timeout: std::time::Duration,
    ) -> Self {
        Self {
            scorer,
            generator,
            max_attempts: max_attempts.max(1),
            attempt_timeout,
            event_tx: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Emit progress events on the given channel.
    pub fn with_events(mut self, event_tx: mpsc::Sender<GenerationEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// Observe a cancellation token between attempts.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the loop for one fingerprint: at most `max_attempts` collaborator
    /// calls, ending in exactly one of an accepted story or a typed failure.
    pub async fn generate_story(
        &self,
        fingerprint: &PhonicsFingerprint,
    ) -> EngineResult<GeneratedStory> {
        let taught = grapheme_set(&fingerprint.taught_graphemes);
        let target = grapheme_set(&fingerprint.target_graphemes);

        let mut cost = GenerationCost::default();
        let mut last_report: Option<DecodabilityReport> = None;
        let mut last_generator_error: Option<GeneratorError> = None;
        let mut avoidance: Vec<String> = Vec::new();

        for attempt in 1..=self.max_attempts {
            if self.cancel.is_cancelled() {
                info!(attempt, "Story generation cancelled between attempts");
                return Err(EngineError::Cancelled);
            }

            self.emit(GenerationEvent::AttemptStarted {
                attempt,
                max_attempts: self.max_attempts,
            })
            .await;

            let context = if attempt == 1 {
                RegenerationContext::first()
            } else {
                RegenerationContext::retry(attempt, avoidance.clone())
            };
            let prompt = build_prompt(
                fingerprint,
                self.scorer.inventory(),
                self.scorer.tricky_words(),
                &context,
            );

            let generated =
                match tokio::time::timeout(self.attempt_timeout, self.generator.generate(&prompt))
                    .await
                {
                    Err(_elapsed) => {
                        warn!(attempt, "Generation attempt timed out");
                        last_generator_error = Some(GeneratorError::Timeout);
                        self.emit(GenerationEvent::AttemptFailed {
                            attempt,
                            reason: "timed out".to_string(),
                        })
                        .await;
                        continue;
                    }
                    Ok(Err(e)) => {
                        warn!(attempt, error = %e, "Generation attempt failed");
                        self.emit(GenerationEvent::AttemptFailed {
                            attempt,
                            reason: e.to_string(),
                        })
                        .await;
                        last_generator_error = Some(e);
                        continue;
                    }
                    Ok(Ok(generated)) => generated,
                };

            cost.accumulate(generated.cost);

            let report = self
                .scorer
                .validate_story(&generated.draft.full_text(), &taught, &target);

            debug!(
                attempt,
                token_score = report.token_score,
                unique_score = report.unique_score,
                target_coverage = report.target_coverage,
                passes = report.passes_threshold,
                "Validated draft"
            );

            self.emit(GenerationEvent::AttemptValidated {
                attempt,
                token_score: report.token_score,
                passes: report.passes_threshold,
            })
            .await;

            if report.passes_threshold {
                let story = self.materialize(fingerprint, generated.draft, report, cost, attempt);
                info!(
                    attempt,
                    story_id = %story.story_id,
                    cost_usd = story.cost.total_usd,
                    "Story accepted"
                );
                self.emit(GenerationEvent::StoryAccepted {
                    attempt,
                    story_id: story.story_id,
                })
                .await;
                return Ok(story);
            }

            avoidance = report.undecodable_words.clone();
            last_report = Some(report);
        }

        self.emit(GenerationEvent::Exhausted {
            attempts: self.max_attempts,
        })
        .await;

        match last_report {
            Some(report) => {
                info!(
                    attempts = self.max_attempts,
                    token_score = report.token_score,
                    "Story generation exhausted without passing threshold"
                );
                Err(EngineError::Exhausted {
                    attempts: self.max_attempts,
                    report,
                    cost,
                })
            }
            // every attempt died at the collaborator; surface that as-is
            None => Err(EngineError::Collaborator(last_generator_error.unwrap_or(
                GeneratorError::Api("no generation attempt completed".to_string()),
            ))),
        }
    }

    fn materialize(
        &self,
        fingerprint: &PhonicsFingerprint,
        draft: crate::generation::generator::StoryDraft,
        report: DecodabilityReport,
        cost: GenerationCost,
        attempts: u32,
    ) -> GeneratedStory {
        let pages = draft
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| StoryPage {
                page_number: (i + 1) as u32,
                text: page.text,
            })
            .collect();

        GeneratedStory {
            story_id: Uuid::new_v4(),
            title: draft.title,
            pages,
            characters: draft.characters,
            metadata: StoryMetadata {
                phase: fingerprint.phase,
                themes: fingerprint.themes.clone(),
                series_id: fingerprint.series_id,
                model: self.generator.model().to_string(),
                attempts,
                generated_at: chrono::Utc::now(),
            },
            decodability: report,
            cost,
        }
    }

    async fn emit(&self, event: GenerationEvent) {
        if let Some(tx) = &self.event_tx {
            if tx.send(event).await.is_err() {
                debug!("Generation event receiver dropped");
            }
        }
    }
}
