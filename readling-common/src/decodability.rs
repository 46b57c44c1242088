//! Decodability report types
//!
//! Produced by the decodability engine, consumed by the reader UI and the
//! knowledge-tracing service. Both are derived values: recomputed per
//! validation call, immutable once returned, never persisted by the engine.

use crate::gpc::Gpc;
use serde::{Deserialize, Serialize};

/// Per-word decodability verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDecodability {
    /// Normalized word the verdict is about
    pub word: String,
    /// True iff the word is a tricky word or every required GPC is taught
    pub is_decodable: bool,
    /// Correspondences in decomposition order (duplicates preserved)
    pub required_gpcs: Vec<Gpc>,
    /// Correspondences outside the taught set (deduplicated by grapheme)
    pub untaught_gpcs: Vec<Gpc>,
    /// Word is in the tricky-word set (bypasses GPC checking)
    pub is_tricky_word: bool,
}

/// Aggregate decodability report over a text.
///
/// The token-weighted score is the binding acceptance gate: a single
/// repeated undecodable word is penalized proportionally to how often a
/// child actually encounters it. The unique-word score is reported for
/// UX only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodabilityReport {
    /// Total word tokens in the text
    pub total_words: usize,
    /// Distinct normalized words
    pub unique_words: usize,
    /// Decodable token occurrences
    pub decodable_words: usize,
    /// Decodable distinct words
    pub decodable_unique_words: usize,
    /// Distinct undecodable words, sorted (reports are bit-identical for
    /// identical inputs)
    pub undecodable_words: Vec<String>,
    /// decodable tokens / total tokens; 0.0 for empty text
    pub token_score: f32,
    /// decodable uniques / uniques; 0.0 for empty text
    pub unique_score: f32,
    /// Distinct target graphemes observed / target set size; 1.0 when the
    /// target set is empty
    pub target_coverage: f32,
    /// Threshold the token score was gated against
    pub threshold: f32,
    /// token_score >= threshold
    pub passes_threshold: bool,
}

impl DecodabilityReport {
    /// Degenerate report for empty input: all counts zero, scores 0.0,
    /// does not pass. An empty page is a valid case, not an error.
    pub fn empty(threshold: f32) -> Self {
        Self {
            total_words: 0,
            unique_words: 0,
            decodable_words: 0,
            decodable_unique_words: 0,
            undecodable_words: Vec::new(),
            token_score: 0.0,
            unique_score: 0.0,
            target_coverage: 1.0,
            threshold,
            passes_threshold: false,
        }
    }
}
