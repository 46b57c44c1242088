//! Grapheme-phoneme correspondence (GPC) inventory and tricky-word set
//!
//! The inventory is the master table of letter-pattern → sound rules a
//! curriculum teaches, ordered longest-grapheme-first so matching is
//! unambiguous. A learner's taught and target sets are subsets of this
//! table, identified by grapheme text (case-insensitive).
//!
//! Split digraphs ("a_e" as in "make") are flagged by the underscore in the
//! grapheme and are matched by lookahead rather than literal prefix; they
//! live in the same table so the matching priority stays auditable.
//!
//! Tricky words are high-frequency words taught as memorized wholes; they are
//! decodable by definition regardless of GPC coverage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single grapheme-phoneme correspondence, the atomic unit of phonics
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gpc {
    /// Written letter pattern ("sh", "igh", "a_e")
    pub grapheme: String,
    /// Sound the pattern maps to (IPA-style)
    pub phoneme: String,
    /// Example words used in prompts and teaching material
    #[serde(default)]
    pub examples: Vec<String>,
}

impl Gpc {
    pub fn new(grapheme: &str, phoneme: &str, examples: &[&str]) -> Self {
        Self {
            grapheme: grapheme.to_string(),
            phoneme: phoneme.to_string(),
            examples: examples.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Synthetic single-character correspondence emitted when decomposition
    /// meets a character no inventory entry covers. Grapheme and phoneme are
    /// both the character itself; a synthetic entry is never in a taught set.
    pub fn synthetic(c: char) -> Self {
        Self {
            grapheme: c.to_string(),
            phoneme: c.to_string(),
            examples: Vec::new(),
        }
    }

    /// Split digraphs carry an underscore between their letters ("a_e").
    pub fn is_split(&self) -> bool {
        self.grapheme.contains('_')
    }

    /// Number of alphabetic characters in the grapheme. For a split digraph
    /// this counts the vowel and the silent `e` (2), not the underscore, so
    /// decomposition lengths add up to the normalized word length.
    pub fn alpha_len(&self) -> usize {
        self.grapheme.chars().filter(|c| c.is_alphabetic()).count()
    }
}

/// Static definition used to build the default inventory.
struct GpcDef {
    grapheme: &'static str,
    phoneme: &'static str,
    examples: &'static [&'static str],
    phase: u8,
}

/// Default English inventory, Letters-and-Sounds style, phases 2-5.
///
/// Table order is teaching order; `GpcInventory::new` re-sorts
/// longest-grapheme-first for matching.
const DEFAULT_CORRESPONDENCES: &[GpcDef] = &[
    // Phase 2
    GpcDef { grapheme: "s", phoneme: "s", examples: &["sat", "sun", "sit"], phase: 2 },
    GpcDef { grapheme: "a", phoneme: "æ", examples: &["ant", "and", "pat"], phase: 2 },
    GpcDef { grapheme: "t", phoneme: "t", examples: &["tap", "tin", "pot"], phase: 2 },
    GpcDef { grapheme: "p", phoneme: "p", examples: &["pan", "pit", "nap"], phase: 2 },
    GpcDef { grapheme: "i", phoneme: "ɪ", examples: &["it", "in", "pin"], phase: 2 },
    GpcDef { grapheme: "n", phoneme: "n", examples: &["net", "nap", "pan"], phase: 2 },
    GpcDef { grapheme: "m", phoneme: "m", examples: &["map", "man", "mud"], phase: 2 },
    GpcDef { grapheme: "d", phoneme: "d", examples: &["dog", "dad", "dip"], phase: 2 },
    GpcDef { grapheme: "g", phoneme: "g", examples: &["gap", "gut", "dig"], phase: 2 },
    GpcDef { grapheme: "o", phoneme: "ɒ", examples: &["on", "ox", "pot"], phase: 2 },
    GpcDef { grapheme: "c", phoneme: "k", examples: &["cat", "cot", "cap"], phase: 2 },
    GpcDef { grapheme: "k", phoneme: "k", examples: &["kit", "kid", "kin"], phase: 2 },
    GpcDef { grapheme: "ck", phoneme: "k", examples: &["duck", "sock", "kick"], phase: 2 },
    GpcDef { grapheme: "e", phoneme: "ɛ", examples: &["egg", "end", "pet"], phase: 2 },
    GpcDef { grapheme: "u", phoneme: "ʌ", examples: &["up", "us", "mud"], phase: 2 },
    GpcDef { grapheme: "r", phoneme: "r", examples: &["rat", "run", "rim"], phase: 2 },
    GpcDef { grapheme: "h", phoneme: "h", examples: &["hat", "hen", "hop"], phase: 2 },
    GpcDef { grapheme: "b", phoneme: "b", examples: &["bat", "bed", "bug"], phase: 2 },
    GpcDef { grapheme: "f", phoneme: "f", examples: &["fan", "fit", "fog"], phase: 2 },
    GpcDef { grapheme: "ff", phoneme: "f", examples: &["off", "puff", "huff"], phase: 2 },
    GpcDef { grapheme: "l", phoneme: "l", examples: &["leg", "lap", "lot"], phase: 2 },
    GpcDef { grapheme: "ll", phoneme: "l", examples: &["bell", "doll", "hill"], phase: 2 },
    GpcDef { grapheme: "ss", phoneme: "s", examples: &["hiss", "mess", "less"], phase: 2 },
    // Phase 3
    GpcDef { grapheme: "j", phoneme: "dʒ", examples: &["jam", "jet", "jog"], phase: 3 },
    GpcDef { grapheme: "v", phoneme: "v", examples: &["van", "vet", "visit"], phase: 3 },
    GpcDef { grapheme: "w", phoneme: "w", examples: &["win", "wag", "web"], phase: 3 },
    GpcDef { grapheme: "x", phoneme: "ks", examples: &["box", "fox", "mix"], phase: 3 },
    GpcDef { grapheme: "y", phoneme: "j", examples: &["yes", "yak", "yet"], phase: 3 },
    GpcDef { grapheme: "z", phoneme: "z", examples: &["zip", "zig", "zag"], phase: 3 },
    GpcDef { grapheme: "zz", phoneme: "z", examples: &["buzz", "fizz", "jazz"], phase: 3 },
    GpcDef { grapheme: "qu", phoneme: "kw", examples: &["quit", "quiz", "quack"], phase: 3 },
    GpcDef { grapheme: "ch", phoneme: "tʃ", examples: &["chip", "chat", "much"], phase: 3 },
    GpcDef { grapheme: "sh", phoneme: "ʃ", examples: &["shop", "ship", "fish"], phase: 3 },
    GpcDef { grapheme: "th", phoneme: "θ", examples: &["thin", "moth", "then"], phase: 3 },
    GpcDef { grapheme: "ng", phoneme: "ŋ", examples: &["ring", "song", "king"], phase: 3 },
    GpcDef { grapheme: "ai", phoneme: "eɪ", examples: &["rain", "wait", "tail"], phase: 3 },
    GpcDef { grapheme: "ee", phoneme: "iː", examples: &["see", "feet", "been"], phase: 3 },
    GpcDef { grapheme: "igh", phoneme: "aɪ", examples: &["high", "night", "light"], phase: 3 },
    GpcDef { grapheme: "oa", phoneme: "əʊ", examples: &["boat", "coat", "road"], phase: 3 },
    GpcDef { grapheme: "oo", phoneme: "uː", examples: &["moon", "zoo", "food"], phase: 3 },
    GpcDef { grapheme: "ar", phoneme: "ɑː", examples: &["car", "park", "farm"], phase: 3 },
    GpcDef { grapheme: "or", phoneme: "ɔː", examples: &["for", "fork", "torn"], phase: 3 },
    GpcDef { grapheme: "ur", phoneme: "ɜː", examples: &["fur", "burn", "turn"], phase: 3 },
    GpcDef { grapheme: "ow", phoneme: "aʊ", examples: &["cow", "how", "down"], phase: 3 },
    GpcDef { grapheme: "oi", phoneme: "ɔɪ", examples: &["coin", "join", "soil"], phase: 3 },
    GpcDef { grapheme: "ear", phoneme: "ɪə", examples: &["ear", "hear", "near"], phase: 3 },
    GpcDef { grapheme: "air", phoneme: "eə", examples: &["air", "fair", "hair"], phase: 3 },
    GpcDef { grapheme: "ure", phoneme: "ʊə", examples: &["sure", "pure", "cure"], phase: 3 },
    GpcDef { grapheme: "er", phoneme: "ə", examples: &["her", "hammer", "letter"], phase: 3 },
    // Phase 5
    GpcDef { grapheme: "ay", phoneme: "eɪ", examples: &["day", "play", "say"], phase: 5 },
    GpcDef { grapheme: "ou", phoneme: "aʊ", examples: &["out", "about", "cloud"], phase: 5 },
    GpcDef { grapheme: "ie", phoneme: "aɪ", examples: &["tie", "pie", "lie"], phase: 5 },
    GpcDef { grapheme: "ea", phoneme: "iː", examples: &["eat", "sea", "read"], phase: 5 },
    GpcDef { grapheme: "oy", phoneme: "ɔɪ", examples: &["boy", "toy", "enjoy"], phase: 5 },
    GpcDef { grapheme: "ir", phoneme: "ɜː", examples: &["girl", "bird", "first"], phase: 5 },
    GpcDef { grapheme: "ue", phoneme: "uː", examples: &["blue", "clue", "true"], phase: 5 },
    GpcDef { grapheme: "aw", phoneme: "ɔː", examples: &["saw", "paw", "yawn"], phase: 5 },
    GpcDef { grapheme: "wh", phoneme: "w", examples: &["when", "which", "wheel"], phase: 5 },
    GpcDef { grapheme: "ph", phoneme: "f", examples: &["photo", "dolphin", "phonics"], phase: 5 },
    GpcDef { grapheme: "ew", phoneme: "uː", examples: &["new", "flew", "grew"], phase: 5 },
    GpcDef { grapheme: "oe", phoneme: "əʊ", examples: &["toe", "goes", "tiptoe"], phase: 5 },
    GpcDef { grapheme: "au", phoneme: "ɔː", examples: &["haul", "launch", "august"], phase: 5 },
    GpcDef { grapheme: "ey", phoneme: "iː", examples: &["key", "money", "donkey"], phase: 5 },
    GpcDef { grapheme: "a_e", phoneme: "eɪ", examples: &["make", "cake", "game"], phase: 5 },
    GpcDef { grapheme: "e_e", phoneme: "iː", examples: &["these", "theme", "complete"], phase: 5 },
    GpcDef { grapheme: "i_e", phoneme: "aɪ", examples: &["like", "time", "ride"], phase: 5 },
    GpcDef { grapheme: "o_e", phoneme: "əʊ", examples: &["home", "bone", "nose"], phase: 5 },
    GpcDef { grapheme: "u_e", phoneme: "juː", examples: &["cube", "tune", "huge"], phase: 5 },
];

/// Default tricky-word set: high-frequency words taught as memorized wholes.
const DEFAULT_TRICKY_WORDS: &[&str] = &[
    "the", "to", "i", "no", "go", "into", "he", "she", "we", "me", "be",
    "was", "you", "they", "all", "are", "my", "her", "said", "have", "like",
    "so", "do", "some", "come", "were", "there", "little", "one", "when",
    "out", "what", "oh", "their", "people", "mr", "mrs", "looked", "called",
    "asked", "could", "water", "where", "who", "again", "thought", "through",
    "work", "mouse", "many", "laughed", "because", "different", "any", "eyes",
    "friends", "once", "please",
];

/// Ordered, immutable grapheme-phoneme inventory.
///
/// Invariant: entries are sorted by grapheme length descending (alphabetic
/// characters only, ties broken by grapheme text) so longest-match-first
/// scanning is unambiguous. Construct once and share (`Arc<GpcInventory>`);
/// per-tenant inventory variants are just different constructions.
/// Deserialization goes through `new` so the ordering invariant holds
/// regardless of wire order.
#[derive(Debug, Clone, Serialize)]
pub struct GpcInventory {
    entries: Vec<Gpc>,
}

impl<'de> Deserialize<'de> for GpcInventory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            entries: Vec<Gpc>,
        }
        Ok(GpcInventory::new(Raw::deserialize(deserializer)?.entries))
    }
}

impl GpcInventory {
    /// Build an inventory from arbitrary entries, establishing the
    /// longest-match-first ordering invariant.
    pub fn new(mut entries: Vec<Gpc>) -> Self {
        entries.sort_by(|a, b| {
            b.alpha_len()
                .cmp(&a.alpha_len())
                .then_with(|| a.grapheme.cmp(&b.grapheme))
        });
        entries.dedup_by(|a, b| a.grapheme == b.grapheme);
        Self { entries }
    }

    /// Full default inventory (phases 2-5).
    pub fn letters_and_sounds() -> Self {
        Self::up_to_phase(u8::MAX)
    }

    /// Default inventory restricted to correspondences taught by `phase`.
    pub fn up_to_phase(phase: u8) -> Self {
        let entries = DEFAULT_CORRESPONDENCES
            .iter()
            .filter(|def| def.phase <= phase)
            .map(|def| Gpc::new(def.grapheme, def.phoneme, def.examples))
            .collect();
        Self::new(entries)
    }

    /// All entries, longest grapheme first.
    pub fn entries(&self) -> &[Gpc] {
        &self.entries
    }

    /// Entries matched by literal prefix scan (split digraphs excluded).
    pub fn literal_entries(&self) -> impl Iterator<Item = &Gpc> {
        self.entries.iter().filter(|gpc| !gpc.is_split())
    }

    /// The split-digraph entry starting with `vowel`, if the inventory
    /// carries one ("a" → "a_e").
    pub fn split_for(&self, vowel: char) -> Option<&Gpc> {
        self.entries
            .iter()
            .filter(|gpc| gpc.is_split())
            .find(|gpc| gpc.grapheme.chars().next() == Some(vowel))
    }

    /// Case-insensitive lookup by grapheme text.
    pub fn get(&self, grapheme: &str) -> Option<&Gpc> {
        let needle = grapheme.to_lowercase();
        self.entries.iter().find(|gpc| gpc.grapheme == needle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed set of high-frequency words taught as wholes rather than sounded
/// out. Membership is case-insensitive and ignores non-alphabetic
/// characters; deserialization re-normalizes so the insensitivity holds for
/// externally supplied sets too.
#[derive(Debug, Clone, Serialize)]
pub struct TrickyWords {
    words: BTreeSet<String>,
}

impl<'de> Deserialize<'de> for TrickyWords {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            words: Vec<String>,
        }
        Ok(TrickyWords::new(Raw::deserialize(deserializer)?.words))
    }
}

impl TrickyWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| normalize_word(w.as_ref()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Default high-frequency set matching the default inventory.
    pub fn default_set() -> Self {
        Self::new(DEFAULT_TRICKY_WORDS.iter().copied())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize_word(word))
    }

    /// Deterministically ordered view, for prompt construction.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.as_str())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for TrickyWords {
    fn default() -> Self {
        Self::default_set()
    }
}

/// Normalize a word for matching: lowercase, alphabetic characters only.
pub fn normalize_word(word: &str) -> String {
    word.chars()
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_alphabetic())
        .collect()
}

/// Tokenize running text into lowercase alphabetic words
/// (whitespace/punctuation-delimited).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|token| !token.is_empty())
        .map(|token| token.chars().flat_map(|c| c.to_lowercase()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_is_sorted_longest_first() {
        let inventory = GpcInventory::letters_and_sounds();
        let lengths: Vec<usize> = inventory.entries().iter().map(|g| g.alpha_len()).collect();
        for pair in lengths.windows(2) {
            assert!(pair[0] >= pair[1], "inventory not sorted longest-first");
        }
    }

    #[test]
    fn literal_entries_exclude_split_digraphs() {
        let inventory = GpcInventory::letters_and_sounds();
        assert!(inventory.literal_entries().all(|g| !g.is_split()));
        // but the split entries are still in the table
        assert!(inventory.entries().iter().any(|g| g.grapheme == "a_e"));
    }

    #[test]
    fn split_for_finds_each_vowel_pattern() {
        let inventory = GpcInventory::letters_and_sounds();
        for vowel in ['a', 'e', 'i', 'o', 'u'] {
            let gpc = inventory.split_for(vowel).unwrap();
            assert_eq!(gpc.grapheme, format!("{}_e", vowel));
            assert_eq!(gpc.alpha_len(), 2);
        }
        assert!(inventory.split_for('y').is_none());
    }

    #[test]
    fn phase_two_inventory_has_no_phase_three_digraphs() {
        let inventory = GpcInventory::up_to_phase(2);
        assert!(inventory.get("ck").is_some());
        assert!(inventory.get("ch").is_none());
        assert!(inventory.get("a_e").is_none());
    }

    #[test]
    fn get_is_case_insensitive() {
        let inventory = GpcInventory::letters_and_sounds();
        assert_eq!(inventory.get("SH").unwrap().grapheme, "sh");
    }

    #[test]
    fn duplicate_graphemes_are_deduplicated() {
        let inventory = GpcInventory::new(vec![
            Gpc::new("sh", "ʃ", &["ship"]),
            Gpc::new("sh", "ʃ", &["shop"]),
            Gpc::new("s", "s", &["sun"]),
        ]);
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn tricky_membership_ignores_case_and_punctuation() {
        let tricky = TrickyWords::default_set();
        assert!(tricky.contains("The"));
        assert!(tricky.contains("mr."));
        assert!(tricky.contains("SAID!"));
        assert!(!tricky.contains("cat"));
    }

    #[test]
    fn normalize_strips_digits_and_punctuation() {
        assert_eq!(normalize_word("Cat-22!"), "cat");
        assert_eq!(normalize_word("123"), "");
        assert_eq!(normalize_word(""), "");
    }

    #[test]
    fn tokenize_splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("The cat, the CAT; sat."),
            vec!["the", "cat", "the", "cat", "sat"]
        );
        assert!(tokenize("  \n\t ").is_empty());
        assert!(tokenize("123 456").is_empty());
    }

    #[test]
    fn deserialized_inventories_are_resorted() {
        let json = r#"{"entries": [
            {"grapheme": "s", "phoneme": "s"},
            {"grapheme": "igh", "phoneme": "aɪ"},
            {"grapheme": "sh", "phoneme": "ʃ"}
        ]}"#;
        let inventory: GpcInventory = serde_json::from_str(json).unwrap();
        let graphemes: Vec<&str> = inventory
            .entries()
            .iter()
            .map(|g| g.grapheme.as_str())
            .collect();
        assert_eq!(graphemes, vec!["igh", "sh", "s"]);
    }

    #[test]
    fn deserialized_tricky_words_are_renormalized() {
        let tricky: TrickyWords =
            serde_json::from_str(r#"{"words": ["The", "Mr."]}"#).unwrap();
        assert!(tricky.contains("the"));
        assert!(tricky.contains("mr"));
    }

    #[test]
    fn synthetic_gpc_maps_character_to_itself() {
        let gpc = Gpc::synthetic('ж');
        assert_eq!(gpc.grapheme, "ж");
        assert_eq!(gpc.phoneme, "ж");
        assert!(!gpc.is_split());
        assert_eq!(gpc.alpha_len(), 1);
    }
}
