//! Read-aloud assessment types
//!
//! One assessment is produced per spoken attempt against one page's expected
//! text. The engine consumes already-transcribed words from the ASR
//! collaborator (it never touches audio) and emits per-word judgements plus
//! per-GPC reinforcement data for the knowledge-tracing service.

use serde::{Deserialize, Serialize};

/// A transcribed spoken word from the ASR collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenWord {
    pub word: String,
    /// Transcription confidence (0.0-1.0)
    pub confidence: f32,
    /// Offset from the start of the attempt
    pub timestamp_ms: u64,
}

/// How an aligned word pair was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgementKind {
    /// Spoken word matches the expected word
    Match,
    /// A different word was said (low character overlap)
    Substitution,
    /// A similar-sounding wrong word was said (character overlap > 60%)
    Mispronunciation,
    /// An extra word with no expected counterpart
    Insertion,
    /// An expected word was skipped entirely
    Omission,
}

/// One aligned pair from the expected/spoken alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordJudgement {
    /// Expected word (absent for insertions)
    pub expected: Option<String>,
    /// Spoken word (absent for omissions)
    pub spoken: Option<String>,
    pub kind: JudgementKind,
    pub correct: bool,
    /// ASR confidence of the spoken word, when one was aligned
    pub confidence: Option<f32>,
}

/// Per-correspondence error aggregate over one attempt.
///
/// Only correspondences with at least one error are reported; reinforcement
/// data for mastered sounds is not actionable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpcReinforcement {
    pub grapheme: String,
    pub phoneme: String,
    pub error_count: u32,
    pub total_occurrences: u32,
}

impl GpcReinforcement {
    pub fn error_rate(&self) -> f32 {
        if self.total_occurrences == 0 {
            0.0
        } else {
            self.error_count as f32 / self.total_occurrences as f32
        }
    }
}

/// Scored read-aloud attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadAloudAssessment {
    /// correct words / expected words (0.0 for an empty expected text)
    pub accuracy: f32,
    /// Words correct per minute; 0 when reading time is unusable
    pub wcpm: u32,
    pub reading_time_ms: u64,
    /// Aligned judgements in reading order
    pub words: Vec<WordJudgement>,
    /// Sorted descending by error rate, zero-error entries omitted
    pub gpc_reinforcement: Vec<GpcReinforcement>,
}
