//! Word-sequence alignment
//!
//! Classic Levenshtein dynamic programming over two token sequences with
//! unit costs, backtracked into an ordered list of aligned pairs. The
//! backtrack tie-break is fixed — diagonal (match/substitution) over
//! horizontal (insertion) over vertical (omission) — so two runs over
//! identical input produce identical alignments.
//!
//! Substitutions are reclassified as mispronunciations when the character
//! overlap exceeds 60%: "said a similar-sounding wrong word" is a
//! different reading error than "said a completely different word".

use readling_common::assessment::JudgementKind;
use std::collections::HashSet;

/// Overlap ratio above which a substitution counts as a mispronunciation.
const MISPRONUNCIATION_OVERLAP: f32 = 0.6;

/// One aligned position: indices into the expected and spoken sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedPair {
    /// Index into the expected sequence (absent for insertions)
    pub expected: Option<usize>,
    /// Index into the spoken sequence (absent for omissions)
    pub spoken: Option<usize>,
    pub kind: JudgementKind,
}

/// Fraction of spoken characters present in the expected word's character
/// set, over the longer word's length.
fn character_overlap(expected: &str, spoken: &str) -> f32 {
    let expected_chars: HashSet<char> = expected.chars().collect();
    let longer = expected.chars().count().max(spoken.chars().count());
    if longer == 0 {
        return 0.0;
    }
    let shared = spoken.chars().filter(|c| expected_chars.contains(c)).count();
    shared as f32 / longer as f32
}

fn classify_substitution(expected: &str, spoken: &str) -> JudgementKind {
    if character_overlap(expected, spoken) > MISPRONUNCIATION_OVERLAP {
        JudgementKind::Mispronunciation
    } else {
        JudgementKind::Substitution
    }
}

/// Align two token sequences.
///
/// Total for any input, including empty sequences on either side.
pub fn align(expected: &[String], spoken: &[String]) -> Vec<AlignedPair> {
    let m = expected.len();
    let n = spoken.len();

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        dp[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(expected[i - 1] != spoken[j - 1]);
            dp[i][j] = (dp[i - 1][j - 1] + cost)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j] + 1);
        }
    }

    // Backtrack dp[m][n] -> dp[0][0]. Branch order is the tie-break:
    // diagonal, then horizontal (insertion), then vertical (omission).
    let mut pairs = Vec::with_capacity(m.max(n));
    let mut i = m;
    let mut j = n;
    while i > 0 || j > 0 {
        if i > 0 && j > 0 {
            let cost = usize::from(expected[i - 1] != spoken[j - 1]);
            if dp[i][j] == dp[i - 1][j - 1] + cost {
                let kind = if cost == 0 {
                    JudgementKind::Match
                } else {
                    classify_substitution(&expected[i - 1], &spoken[j - 1])
                };
                pairs.push(AlignedPair {
                    expected: Some(i - 1),
                    spoken: Some(j - 1),
                    kind,
                });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if j > 0 && dp[i][j] == dp[i][j - 1] + 1 {
            pairs.push(AlignedPair {
                expected: None,
                spoken: Some(j - 1),
                kind: JudgementKind::Insertion,
            });
            j -= 1;
            continue;
        }
        pairs.push(AlignedPair {
            expected: Some(i - 1),
            spoken: None,
            kind: JudgementKind::Omission,
        });
        i -= 1;
    }
    pairs.reverse();
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn kinds(expected: &[&str], spoken: &[&str]) -> Vec<JudgementKind> {
        align(&words(expected), &words(spoken))
            .into_iter()
            .map(|p| p.kind)
            .collect()
    }

    #[test]
    fn identical_sequences_are_all_matches() {
        let kinds = kinds(&["the", "cat", "sat"], &["the", "cat", "sat"]);
        assert_eq!(kinds, vec![JudgementKind::Match; 3]);
    }

    #[test]
    fn unrelated_substitution_stays_a_substitution() {
        // "cat" vs "big": no shared characters
        let kinds = kinds(&["the", "cat", "sat"], &["the", "big", "sat"]);
        assert_eq!(
            kinds,
            vec![
                JudgementKind::Match,
                JudgementKind::Substitution,
                JudgementKind::Match
            ]
        );
    }

    #[test]
    fn close_substitution_becomes_mispronunciation() {
        // "can" shares c and a with "cat": overlap 2/3 > 0.6
        let kinds = kinds(&["cat"], &["can"]);
        assert_eq!(kinds, vec![JudgementKind::Mispronunciation]);
    }

    #[test]
    fn skipped_word_is_an_omission() {
        let pairs = align(&words(&["the", "cat", "sat"]), &words(&["the", "sat"]));
        let omissions: Vec<&AlignedPair> = pairs
            .iter()
            .filter(|p| p.kind == JudgementKind::Omission)
            .collect();
        assert_eq!(omissions.len(), 1);
        assert_eq!(omissions[0].expected, Some(1));
        assert_eq!(omissions[0].spoken, None);
    }

    #[test]
    fn extra_word_is_an_insertion() {
        let pairs = align(&words(&["the", "cat"]), &words(&["the", "big", "cat"]));
        let insertions: Vec<&AlignedPair> = pairs
            .iter()
            .filter(|p| p.kind == JudgementKind::Insertion)
            .collect();
        assert_eq!(insertions.len(), 1);
        assert_eq!(insertions[0].spoken, Some(1));
        assert_eq!(insertions[0].expected, None);
    }

    #[test]
    fn empty_sequences_align_totally() {
        assert!(align(&[], &[]).is_empty());

        let all_omitted = align(&words(&["a", "b"]), &[]);
        assert!(all_omitted
            .iter()
            .all(|p| p.kind == JudgementKind::Omission));

        let all_inserted = align(&[], &words(&["a", "b"]));
        assert!(all_inserted
            .iter()
            .all(|p| p.kind == JudgementKind::Insertion));
    }

    #[test]
    fn alignment_is_deterministic() {
        let expected = words(&["a", "b", "a", "b"]);
        let spoken = words(&["b", "a", "b", "a"]);
        assert_eq!(align(&expected, &spoken), align(&expected, &spoken));
    }

    #[test]
    fn overlap_is_measured_against_the_longer_word() {
        // all of "see" appears in "sheep"'s set, but "sheep" is longer
        assert!(character_overlap("sheep", "see") < MISPRONUNCIATION_OVERLAP + 0.01);
        assert_eq!(character_overlap("", ""), 0.0);
    }
}
