//! Story and learner-context types
//!
//! `PhonicsFingerprint` is supplied by the learner-profile service and is
//! read-only input to the engine. `GeneratedStory` is only materialized when
//! a regeneration attempt passes the decodability threshold; a story that
//! never passes is never constructed.

use crate::decodability::DecodabilityReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Learner context for story generation: what the child has been taught,
/// what to emphasize next, and what they like reading about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonicsFingerprint {
    /// Learner this fingerprint describes (absent for anonymous previews)
    #[serde(default)]
    pub learner_id: Option<Uuid>,
    /// Curriculum phase the learner is working in
    pub phase: u8,
    /// Learner age in years, used to pitch vocabulary and themes
    #[serde(default)]
    pub age: Option<u8>,
    /// Graphemes the learner has been taught (identifies GPCs by text)
    pub taught_graphemes: Vec<String>,
    /// Graphemes currently being taught, to emphasize in new stories
    #[serde(default)]
    pub target_graphemes: Vec<String>,
    /// Story themes the learner enjoys
    #[serde(default)]
    pub themes: Vec<String>,
    /// Recurring characters to reuse across a series
    #[serde(default)]
    pub recurring_characters: Vec<String>,
    /// Series the story continues, if any
    #[serde(default)]
    pub series_id: Option<Uuid>,
}

/// One page of generated story text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPage {
    pub page_number: u32,
    pub text: String,
}

/// Generation provenance attached to an accepted story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryMetadata {
    pub phase: u8,
    pub themes: Vec<String>,
    #[serde(default)]
    pub series_id: Option<Uuid>,
    /// Model that produced the accepted draft
    pub model: String,
    /// Regeneration attempts consumed, including the accepted one
    pub attempts: u32,
    pub generated_at: DateTime<Utc>,
}

/// Cumulative generation spend across all attempts for one story.
///
/// Cost is summed, never reset: every attempt that reached the collaborator
/// incurred real spend, whether or not its draft was accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationCost {
    pub total_usd: f64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl GenerationCost {
    pub fn accumulate(&mut self, other: GenerationCost) {
        self.total_usd += other.total_usd;
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
    }
}

/// An accepted story: prose, provenance, the report that accepted it, and
/// what it cost to get there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedStory {
    pub story_id: Uuid,
    pub title: String,
    pub pages: Vec<StoryPage>,
    pub characters: Vec<String>,
    pub metadata: StoryMetadata,
    pub decodability: DecodabilityReport,
    pub cost: GenerationCost,
}

impl GeneratedStory {
    /// Full prose across pages, the form the validator scores.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_accumulates_across_attempts() {
        let mut cost = GenerationCost::default();
        cost.accumulate(GenerationCost {
            total_usd: 0.002,
            prompt_tokens: 400,
            completion_tokens: 150,
        });
        cost.accumulate(GenerationCost {
            total_usd: 0.003,
            prompt_tokens: 450,
            completion_tokens: 180,
        });
        assert!((cost.total_usd - 0.005).abs() < 1e-9);
        assert_eq!(cost.prompt_tokens, 850);
        assert_eq!(cost.completion_tokens, 330);
    }

    #[test]
    fn fingerprint_deserializes_with_optional_fields_absent() {
        let fingerprint: PhonicsFingerprint = serde_json::from_str(
            r#"{"phase": 2, "taught_graphemes": ["s", "a", "t"]}"#,
        )
        .unwrap();
        assert_eq!(fingerprint.phase, 2);
        assert!(fingerprint.target_graphemes.is_empty());
        assert!(fingerprint.series_id.is_none());
    }
}
