//! Decodability Scorer
//!
//! Scores a word or a full text against a learner's taught/target GPC sets.
//!
//! # Scoring
//! - **Token-weighted score**: decodable token occurrences ÷ total tokens.
//!   This is the binding acceptance gate: a repeated undecodable word is
//!   penalized proportionally to how often the child actually meets it.
//! - **Unique-word score**: decodable distinct words ÷ distinct words.
//!   Reported for UX, never used for gating.
//! - **Target coverage**: distinct target graphemes observed anywhere in the
//!   text ÷ target set size. An empty target set yields full coverage.
//!
//! # Tricky words
//! Words in the tricky set are decodable by definition and bypass GPC
//! checking entirely; they are taught as memorized wholes.
//!
//! # Memoization
//! `validate_story` analyses each distinct word once per call. The memo is
//! call-local: regeneration re-validates full pages repeatedly, so repeated
//! words must not be re-decomposed, and nothing is shared across calls or
//! threads.

use crate::config::DEFAULT_DECODABILITY_THRESHOLD;
use crate::phonics::WordDecomposer;
use readling_common::decodability::{DecodabilityReport, WordDecodability};
use readling_common::gpc::{normalize_word, tokenize, Gpc, GpcInventory, TrickyWords};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Build a normalized lookup set from grapheme names as they arrive in a
/// phonics fingerprint ("SH", "a_e", ...).
pub fn grapheme_set(graphemes: &[String]) -> HashSet<String> {
    graphemes.iter().map(|g| g.to_lowercase()).collect()
}

/// Decodability Scorer
///
/// Pure and synchronous; safe to share behind an `Arc` and call
/// concurrently across unrelated stories.
#[derive(Debug, Clone)]
pub struct DecodabilityScorer {
    decomposer: WordDecomposer,
    tricky_words: TrickyWords,
    threshold: f32,
}

impl DecodabilityScorer {
    pub fn new(inventory: Arc<GpcInventory>, tricky_words: TrickyWords) -> Self {
        Self {
            decomposer: WordDecomposer::new(inventory),
            tricky_words,
            threshold: DEFAULT_DECODABILITY_THRESHOLD,
        }
    }

    /// Override the acceptance threshold (default 0.85).
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn decomposer(&self) -> &WordDecomposer {
        &self.decomposer
    }

    pub fn inventory(&self) -> &GpcInventory {
        self.decomposer.inventory()
    }

    pub fn tricky_words(&self) -> &TrickyWords {
        &self.tricky_words
    }

    /// Analyse a single word against a taught grapheme set.
    ///
    /// Tricky words short-circuit before any decomposition: they are
    /// decodable with empty required/untaught lists. Otherwise the word's
    /// correspondences are partitioned by taught-set membership and the
    /// word is decodable iff the untaught partition is empty.
    pub fn analyse_word(&self, word: &str, taught: &HashSet<String>) -> WordDecodability {
        let normalized = normalize_word(word);

        if self.tricky_words.contains(&normalized) {
            return WordDecodability {
                word: normalized,
                is_decodable: true,
                required_gpcs: Vec::new(),
                untaught_gpcs: Vec::new(),
                is_tricky_word: true,
            };
        }

        let required_gpcs = self.decomposer.decompose(&normalized);
        let mut untaught_gpcs: Vec<Gpc> = Vec::new();
        for gpc in &required_gpcs {
            if !taught.contains(&gpc.grapheme)
                && !untaught_gpcs.iter().any(|u| u.grapheme == gpc.grapheme)
            {
                untaught_gpcs.push(gpc.clone());
            }
        }

        WordDecodability {
            word: normalized,
            is_decodable: untaught_gpcs.is_empty(),
            required_gpcs,
            untaught_gpcs,
            is_tricky_word: false,
        }
    }

    /// Validate a full text against taught/target sets using the scorer's
    /// configured threshold.
    pub fn validate_story(
        &self,
        text: &str,
        taught: &HashSet<String>,
        target: &HashSet<String>,
    ) -> DecodabilityReport {
        self.validate_story_with_threshold(text, taught, target, self.threshold)
    }

    /// Validate a full text with an explicit threshold.
    pub fn validate_story_with_threshold(
        &self,
        text: &str,
        taught: &HashSet<String>,
        target: &HashSet<String>,
        threshold: f32,
    ) -> DecodabilityReport {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return DecodabilityReport::empty(threshold);
        }

        let mut memo: HashMap<String, WordDecodability> = HashMap::new();
        let mut decodable_tokens = 0usize;
        for token in &tokens {
            let analysis = memo
                .entry(token.clone())
                .or_insert_with(|| self.analyse_word(token, taught));
            if analysis.is_decodable {
                decodable_tokens += 1;
            }
        }

        let unique_words = memo.len();
        let decodable_unique_words = memo.values().filter(|a| a.is_decodable).count();

        let mut undecodable_words: Vec<String> = memo
            .values()
            .filter(|a| !a.is_decodable)
            .map(|a| a.word.clone())
            .collect();
        undecodable_words.sort();

        let target_coverage = if target.is_empty() {
            1.0
        } else {
            let observed: HashSet<&str> = memo
                .values()
                .flat_map(|a| a.required_gpcs.iter())
                .map(|g| g.grapheme.as_str())
                .filter(|g| target.contains(*g))
                .collect();
            observed.len() as f32 / target.len() as f32
        };

        let token_score = decodable_tokens as f32 / tokens.len() as f32;
        let unique_score = decodable_unique_words as f32 / unique_words as f32;
        let passes_threshold = token_score >= threshold;

        debug!(
            total = tokens.len(),
            unique = unique_words,
            token_score,
            unique_score,
            target_coverage,
            passes_threshold,
            "Decodability scoring complete"
        );

        DecodabilityReport {
            total_words: tokens.len(),
            unique_words,
            decodable_words: decodable_tokens,
            decodable_unique_words,
            undecodable_words,
            token_score,
            unique_score,
            target_coverage,
            threshold,
            passes_threshold,
        }
    }
}
