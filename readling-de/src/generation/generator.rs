//! Text-generation collaborator interface
//!
//! The engine never writes story prose itself; it asks an external
//! collaborator for a draft and validates the result. Implementations of
//! `StoryGenerator` wrap a concrete provider; the regeneration loop only
//! sees this trait, which keeps each attempt independently testable with a
//! scripted generator.

use crate::generation::prompt::StoryPrompt;
use readling_common::story::GenerationCost;
use serde::Deserialize;
use thiserror::Error;

/// One page of draft prose as returned by the collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftPage {
    pub text: String,
}

/// Structured draft returned by the collaborator, matching the response
/// schema sent with the prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryDraft {
    pub title: String,
    pub pages: Vec<DraftPage>,
    #[serde(default)]
    pub characters: Vec<String>,
    /// Free-form structural note ("problem/resolution", "cumulative") —
    /// carried through for the illustration pipeline, unused here.
    #[serde(default)]
    pub structure: Option<String>,
}

impl StoryDraft {
    /// Full prose across pages, the form the validator scores.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Draft plus what the attempt cost.
#[derive(Debug, Clone)]
pub struct GeneratedDraft {
    pub draft: StoryDraft,
    pub cost: GenerationCost,
}

/// Typed collaborator failure. Fatal for the attempt that hit it; the
/// regeneration loop's attempt budget is the only retry path.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Request never reached the API or the connection dropped
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("API error: {0}")]
    Api(String),

    /// The API answered, but not with parseable draft JSON
    #[error("Malformed generation response: {0}")]
    Parse(String),

    /// The attempt exceeded its wall-clock budget
    #[error("Generation attempt timed out")]
    Timeout,
}

/// Text-generation collaborator.
///
/// Implementations must be safe to share across concurrently generated
/// stories; the loop holds one behind an `Arc`.
#[async_trait::async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generator name for provenance and logging
    fn name(&self) -> &'static str;

    /// Model identifier recorded in accepted story metadata
    fn model(&self) -> &str;

    /// Produce one draft for the given prompt.
    ///
    /// # Errors
    /// Returns `GeneratorError` if the round-trip or parsing fails; the
    /// caller decides whether attempts remain.
    async fn generate(&self, prompt: &StoryPrompt) -> Result<GeneratedDraft, GeneratorError>;
}
