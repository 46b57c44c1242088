//! Word Decomposer
//!
//! Decomposes a token into an ordered sequence of grapheme-phoneme
//! correspondences from the inventory. Two ordered passes per position keep
//! the tie-break auditable:
//!
//! 1. Split-digraph lookahead, only when the current character is a vowel:
//!    vowel + exactly one consonant + terminal silent `e` with a matching
//!    `v_e` inventory entry. The split entry is emitted once at the vowel;
//!    the terminal `e` is reserved and consumed silently when the scan
//!    reaches it. The intervening consonant is matched normally.
//! 2. Literal longest-grapheme-first prefix scan over the non-split entries.
//!
//! If neither pass matches, a synthetic single-character correspondence is
//! emitted and the scan advances one position, so decomposition never fails
//! on unknown spellings.

use readling_common::gpc::{normalize_word, Gpc, GpcInventory};
use std::sync::Arc;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Deterministic, total decomposer over a shared immutable inventory.
#[derive(Debug, Clone)]
pub struct WordDecomposer {
    inventory: Arc<GpcInventory>,
}

impl WordDecomposer {
    pub fn new(inventory: Arc<GpcInventory>) -> Self {
        Self { inventory }
    }

    pub fn inventory(&self) -> &GpcInventory {
        &self.inventory
    }

    /// Decompose a word into inventory correspondences.
    ///
    /// Total for any input: digits and punctuation are stripped before
    /// scanning, the empty word yields an empty sequence, and unmatched
    /// characters (including non-Latin scripts) become synthetic
    /// single-character correspondences.
    pub fn decompose(&self, word: &str) -> Vec<Gpc> {
        let chars: Vec<char> = normalize_word(word).chars().collect();
        let mut gpcs = Vec::new();
        let mut reserved_e: Option<usize> = None;
        let mut pos = 0;

        while pos < chars.len() {
            if reserved_e == Some(pos) {
                // tail of a split digraph, already attributed at the vowel
                reserved_e = None;
                pos += 1;
                continue;
            }

            if is_vowel(chars[pos]) && reserved_e.is_none() {
                if let Some(gpc) = self.match_split(&chars, pos) {
                    reserved_e = Some(pos + 2);
                    gpcs.push(gpc.clone());
                    pos += 1;
                    continue;
                }
            }

            // Literal matching never crosses a reserved silent e.
            let limit = reserved_e.unwrap_or(chars.len());
            if let Some(gpc) = self.match_literal(&chars[pos..limit]) {
                pos += gpc.alpha_len();
                gpcs.push(gpc.clone());
                continue;
            }

            gpcs.push(Gpc::synthetic(chars[pos]));
            pos += 1;
        }

        gpcs
    }

    /// Split-digraph lookahead: vowel, one consonant, terminal silent `e`,
    /// and the inventory carries the pattern.
    fn match_split(&self, chars: &[char], pos: usize) -> Option<&Gpc> {
        if pos + 2 != chars.len() - 1 {
            return None;
        }
        let consonant = chars[pos + 1];
        if is_vowel(consonant) || chars[pos + 2] != 'e' {
            return None;
        }
        self.inventory.split_for(chars[pos])
    }

    /// First (longest) non-split inventory grapheme that is a literal prefix
    /// of the remaining text.
    fn match_literal(&self, remaining: &[char]) -> Option<&Gpc> {
        self.inventory.literal_entries().find(|gpc| {
            let mut rest = remaining.iter();
            gpc.grapheme.chars().all(|gc| rest.next() == Some(&gc))
        })
    }
}
