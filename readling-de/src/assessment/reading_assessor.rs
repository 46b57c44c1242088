//! Read-aloud assessment over one page's expected text
//!
//! Consumes transcribed words from the ASR collaborator, aligns them
//! against the expected text, and aggregates accuracy, WCPM, and per-GPC
//! reinforcement counts. The word→GPC map is precomputed upstream by the
//! Word Decomposer and passed in, so the assessor itself stays a pure
//! function over its arguments.

use crate::assessment::aligner::align;
use readling_common::assessment::{
    GpcReinforcement, JudgementKind, ReadAloudAssessment, SpokenWord, WordJudgement,
};
use readling_common::gpc::{normalize_word, tokenize, Gpc};
use std::collections::HashMap;
use tracing::debug;

/// Score one spoken attempt against one page's expected text.
pub fn assess(
    expected_text: &str,
    spoken_words: &[SpokenWord],
    reading_time_ms: u64,
    word_gpc_map: &HashMap<String, Vec<Gpc>>,
) -> ReadAloudAssessment {
    let expected_tokens = tokenize(expected_text);

    // Transcribed words that normalize to nothing (pure punctuation) carry
    // no alignable content.
    let spoken: Vec<(String, f32)> = spoken_words
        .iter()
        .map(|w| (normalize_word(&w.word), w.confidence))
        .filter(|(token, _)| !token.is_empty())
        .collect();
    let spoken_tokens: Vec<String> = spoken.iter().map(|(token, _)| token.clone()).collect();

    let pairs = align(&expected_tokens, &spoken_tokens);

    let words: Vec<WordJudgement> = pairs
        .iter()
        .map(|pair| WordJudgement {
            expected: pair.expected.map(|i| expected_tokens[i].clone()),
            spoken: pair.spoken.map(|j| spoken_tokens[j].clone()),
            kind: pair.kind,
            correct: pair.kind == JudgementKind::Match,
            confidence: pair.spoken.map(|j| spoken[j].1),
        })
        .collect();

    let correct_count = words.iter().filter(|w| w.correct).count();

    let accuracy = if expected_tokens.is_empty() {
        0.0
    } else {
        correct_count as f32 / expected_tokens.len() as f32
    };

    let wcpm = if reading_time_ms == 0 {
        0
    } else {
        let minutes = reading_time_ms as f64 / 60_000.0;
        (correct_count as f64 / minutes).round() as u32
    };

    let gpc_reinforcement = reinforcement(&words, word_gpc_map);

    debug!(
        expected = expected_tokens.len(),
        spoken = spoken_tokens.len(),
        correct = correct_count,
        accuracy,
        wcpm,
        "Read-aloud assessment complete"
    );

    ReadAloudAssessment {
        accuracy,
        wcpm,
        reading_time_ms,
        words,
        gpc_reinforcement,
    }
}

/// Per-correspondence error/total counters over the aligned reference
/// words. Zero-error correspondences are omitted; reinforcement data for
/// mastered sounds is not actionable.
fn reinforcement(
    words: &[WordJudgement],
    word_gpc_map: &HashMap<String, Vec<Gpc>>,
) -> Vec<GpcReinforcement> {
    let mut counters: HashMap<String, GpcReinforcement> = HashMap::new();

    for judgement in words {
        let Some(expected) = &judgement.expected else {
            continue; // insertions have no reference word
        };
        let Some(gpcs) = word_gpc_map.get(expected) else {
            continue;
        };
        for gpc in gpcs {
            let entry = counters
                .entry(gpc.grapheme.clone())
                .or_insert_with(|| GpcReinforcement {
                    grapheme: gpc.grapheme.clone(),
                    phoneme: gpc.phoneme.clone(),
                    error_count: 0,
                    total_occurrences: 0,
                });
            entry.total_occurrences += 1;
            if !judgement.correct {
                entry.error_count += 1;
            }
        }
    }

    let mut reinforcement: Vec<GpcReinforcement> = counters
        .into_values()
        .filter(|r| r.error_count > 0)
        .collect();
    reinforcement.sort_by(|a, b| {
        b.error_rate()
            .partial_cmp(&a.error_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.grapheme.cmp(&b.grapheme))
    });
    reinforcement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonics::WordDecomposer;
    use readling_common::gpc::GpcInventory;
    use std::sync::Arc;

    fn spoken(words: &[(&str, f32)]) -> Vec<SpokenWord> {
        words
            .iter()
            .enumerate()
            .map(|(i, (word, confidence))| SpokenWord {
                word: word.to_string(),
                confidence: *confidence,
                timestamp_ms: (i as u64) * 500,
            })
            .collect()
    }

    fn gpc_map(text: &str) -> HashMap<String, Vec<Gpc>> {
        let decomposer = WordDecomposer::new(Arc::new(GpcInventory::letters_and_sounds()));
        tokenize(text)
            .into_iter()
            .map(|word| {
                let gpcs = decomposer.decompose(&word);
                (word, gpcs)
            })
            .collect()
    }

    #[test]
    fn perfect_reading_scores_full_accuracy() {
        let text = "the cat sat";
        let result = assess(
            text,
            &spoken(&[("the", 0.9), ("cat", 0.95), ("sat", 0.92)]),
            60_000,
            &gpc_map(text),
        );
        assert_eq!(result.accuracy, 1.0);
        assert!(result.words.iter().all(|w| w.kind == JudgementKind::Match));
        assert!(result.gpc_reinforcement.is_empty());
        assert_eq!(result.wcpm, 3);
    }

    #[test]
    fn substituted_word_lowers_accuracy() {
        let text = "the cat sat";
        let result = assess(
            text,
            &spoken(&[("the", 0.9), ("big", 0.8), ("sat", 0.95)]),
            60_000,
            &gpc_map(text),
        );
        let kinds: Vec<JudgementKind> = result.words.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                JudgementKind::Match,
                JudgementKind::Substitution,
                JudgementKind::Match
            ]
        );
        assert!((result.accuracy - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn one_missing_word_is_exactly_one_omission() {
        let text = "the cat sat";
        let result = assess(
            text,
            &spoken(&[("the", 0.9), ("sat", 0.95)]),
            60_000,
            &gpc_map(text),
        );
        let omissions: Vec<&WordJudgement> = result
            .words
            .iter()
            .filter(|w| w.kind == JudgementKind::Omission)
            .collect();
        assert_eq!(omissions.len(), 1);
        assert_eq!(omissions[0].expected.as_deref(), Some("cat"));
        assert!(omissions[0].spoken.is_none());
        assert!((result.accuracy - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn wcpm_scales_with_reading_time() {
        let text = "sat pat";
        let map = gpc_map(text);
        let attempt = spoken(&[("sat", 0.9), ("pat", 0.9)]);

        let half_minute = assess(text, &attempt, 30_000, &map);
        assert_eq!(half_minute.wcpm, 4);

        let zero_time = assess(text, &attempt, 0, &map);
        assert_eq!(zero_time.wcpm, 0);
    }

    #[test]
    fn reinforcement_counts_errors_and_sorts_by_rate() {
        let text = "ship shop";
        // "stop" for "shop": overlap 3/4 > 0.6, a mispronunciation
        let result = assess(
            text,
            &spoken(&[("ship", 0.9), ("stop", 0.7)]),
            60_000,
            &gpc_map(text),
        );

        let graphemes: Vec<&str> = result
            .gpc_reinforcement
            .iter()
            .map(|r| r.grapheme.as_str())
            .collect();
        // "o" errored on its only occurrence; "p" and "sh" errored on one of
        // two; "i" never errored and is omitted
        assert_eq!(graphemes, vec!["o", "p", "sh"]);

        let o = &result.gpc_reinforcement[0];
        assert_eq!(o.error_count, 1);
        assert_eq!(o.total_occurrences, 1);
        let sh = &result.gpc_reinforcement[2];
        assert_eq!(sh.error_count, 1);
        assert_eq!(sh.total_occurrences, 2);
    }

    #[test]
    fn insertions_carry_no_reference_word_and_no_reinforcement() {
        let text = "the cat";
        let result = assess(
            text,
            &spoken(&[("the", 0.9), ("big", 0.5), ("cat", 0.9)]),
            60_000,
            &gpc_map(text),
        );
        assert_eq!(result.accuracy, 1.0);
        let insertion = result
            .words
            .iter()
            .find(|w| w.kind == JudgementKind::Insertion)
            .unwrap();
        assert!(insertion.expected.is_none());
        assert_eq!(insertion.spoken.as_deref(), Some("big"));
        assert!(result.gpc_reinforcement.is_empty());
    }

    #[test]
    fn unalignable_transcriptions_are_dropped() {
        let text = "the cat";
        let result = assess(
            text,
            &spoken(&[("the", 0.9), ("...", 0.1), ("cat", 0.9)]),
            60_000,
            &gpc_map(text),
        );
        assert_eq!(result.accuracy, 1.0);
        assert_eq!(result.words.len(), 2);
    }

    #[test]
    fn assessments_are_deterministic() {
        let text = "a fish can swim and a fish can flip";
        let attempt = spoken(&[
            ("a", 0.9),
            ("fish", 0.9),
            ("can", 0.8),
            ("swum", 0.6),
            ("and", 0.9),
            ("fish", 0.85),
            ("can", 0.8),
            ("flip", 0.9),
        ]);
        let map = gpc_map(text);
        let first = assess(text, &attempt, 42_000, &map);
        let second = assess(text, &attempt, 42_000, &map);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_expected_text_scores_zero() {
        let result = assess("", &spoken(&[("hi", 0.9)]), 10_000, &HashMap::new());
        assert_eq!(result.accuracy, 0.0);
        assert_eq!(result.words.len(), 1);
        assert_eq!(result.words[0].kind, JudgementKind::Insertion);
    }
}
