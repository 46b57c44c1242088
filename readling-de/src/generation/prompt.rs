//! Prompt construction for the text-generation collaborator
//!
//! Each attempt builds its prompt from the learner fingerprint plus a
//! `RegenerationContext`. The context is the only state threaded between
//! attempts besides the counter and the accumulated cost: from attempt 2
//! onward it carries the previous attempt's undecodable words as an
//! avoidance list.

use readling_common::gpc::{GpcInventory, TrickyWords};
use readling_common::story::PhonicsFingerprint;
use serde_json::{json, Value};
use std::fmt::Write;

/// Pages requested per story. Short enough for one sitting, long enough to
/// exercise the target correspondences.
const STORY_PAGES: usize = 5;

/// Feedback threaded between regeneration attempts.
#[derive(Debug, Clone, Default)]
pub struct RegenerationContext {
    /// 1-based attempt number
    pub attempt: u32,
    /// Undecodable words from the previous attempt's report; empty on the
    /// first attempt
    pub previous_undecodable_words: Vec<String>,
}

impl RegenerationContext {
    pub fn first() -> Self {
        Self {
            attempt: 1,
            previous_undecodable_words: Vec::new(),
        }
    }

    pub fn retry(attempt: u32, previous_undecodable_words: Vec<String>) -> Self {
        Self {
            attempt,
            previous_undecodable_words,
        }
    }
}

/// Structured prompt sent to the collaborator.
#[derive(Debug, Clone)]
pub struct StoryPrompt {
    pub system: String,
    pub user: String,
    /// Target JSON schema for the draft the collaborator must return
    pub response_schema: Value,
}

/// Build the prompt for one attempt from the fingerprint and the
/// regeneration context.
pub fn build_prompt(
    fingerprint: &PhonicsFingerprint,
    inventory: &GpcInventory,
    tricky_words: &TrickyWords,
    context: &RegenerationContext,
) -> StoryPrompt {
    let system = "You write very short stories for children who are just learning to read. \
                  Every word must be spellable using only the letter-sound \
                  correspondences listed in the request, or be one of the listed \
                  sight words. Use short sentences. Repetition is good. \
                  Respond only with JSON matching the provided schema."
        .to_string();

    let mut user = String::new();

    writeln!(
        user,
        "Write a {}-page story for a phase {} reader{}.",
        STORY_PAGES,
        fingerprint.phase,
        fingerprint
            .age
            .map(|age| format!(" aged {}", age))
            .unwrap_or_default()
    )
    .ok();

    let taught = describe_graphemes(&fingerprint.taught_graphemes, inventory);
    writeln!(user, "\nLetter-sound correspondences the reader knows:").ok();
    writeln!(user, "{}", taught).ok();

    if !fingerprint.target_graphemes.is_empty() {
        let target = describe_graphemes(&fingerprint.target_graphemes, inventory);
        writeln!(
            user,
            "\nFeature these correspondences as often as possible:"
        )
        .ok();
        writeln!(user, "{}", target).ok();
    }

    let sight_words: Vec<&str> = tricky_words.iter().collect();
    writeln!(
        user,
        "\nSight words that may be used freely: {}",
        sight_words.join(", ")
    )
    .ok();

    if !fingerprint.themes.is_empty() {
        writeln!(user, "\nThemes the reader enjoys: {}", fingerprint.themes.join(", ")).ok();
    }

    if !fingerprint.recurring_characters.is_empty() {
        writeln!(
            user,
            "Continue the series with these characters: {}",
            fingerprint.recurring_characters.join(", ")
        )
        .ok();
    }

    if !context.previous_undecodable_words.is_empty() {
        writeln!(
            user,
            "\nThe previous draft used words this reader cannot decode. Each of \
             these must be replaced with a decodable alternative: {}",
            context.previous_undecodable_words.join(", ")
        )
        .ok();
    }

    StoryPrompt {
        system,
        user,
        response_schema: response_schema(),
    }
}

/// Render grapheme names with their example words, one per line, skipping
/// names the inventory does not know.
fn describe_graphemes(graphemes: &[String], inventory: &GpcInventory) -> String {
    graphemes
        .iter()
        .map(|name| match inventory.get(name) {
            Some(gpc) if !gpc.examples.is_empty() => {
                format!("- {} (as in {})", gpc.grapheme, gpc.examples.join(", "))
            }
            Some(gpc) => format!("- {}", gpc.grapheme),
            None => format!("- {}", name.to_lowercase()),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Target schema for `{title, pages:[{text}], characters, structure}`.
fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "pages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": { "text": { "type": "string" } },
                    "required": ["text"]
                }
            },
            "characters": {
                "type": "array",
                "items": { "type": "string" }
            },
            "structure": { "type": "string" }
        },
        "required": ["title", "pages"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingerprint() -> PhonicsFingerprint {
        PhonicsFingerprint {
            learner_id: None,
            phase: 2,
            age: Some(5),
            taught_graphemes: vec!["s".into(), "a".into(), "t".into(), "p".into()],
            target_graphemes: vec!["p".into()],
            themes: vec!["dogs".into()],
            recurring_characters: vec!["Pip".into()],
            series_id: None,
        }
    }

    #[test]
    fn first_attempt_has_no_avoidance_list() {
        let prompt = build_prompt(
            &fingerprint(),
            &GpcInventory::letters_and_sounds(),
            &TrickyWords::default_set(),
            &RegenerationContext::first(),
        );
        assert!(!prompt.user.contains("must be replaced"));
        assert!(prompt.user.contains("phase 2"));
        assert!(prompt.user.contains("- s (as in"));
        assert!(prompt.user.contains("dogs"));
        assert!(prompt.user.contains("Pip"));
    }

    #[test]
    fn retry_attempts_list_previous_undecodable_words() {
        let context =
            RegenerationContext::retry(2, vec!["quiz".to_string(), "jump".to_string()]);
        let prompt = build_prompt(
            &fingerprint(),
            &GpcInventory::letters_and_sounds(),
            &TrickyWords::default_set(),
            &context,
        );
        assert!(prompt.user.contains("quiz, jump"));
        assert!(prompt.user.contains("decodable alternative"));
    }

    #[test]
    fn unknown_grapheme_names_pass_through_lowercased() {
        let mut fp = fingerprint();
        fp.taught_graphemes.push("XYZZY".into());
        let prompt = build_prompt(
            &fp,
            &GpcInventory::letters_and_sounds(),
            &TrickyWords::default_set(),
            &RegenerationContext::first(),
        );
        assert!(prompt.user.contains("- xyzzy"));
    }

    #[test]
    fn schema_requires_title_and_pages() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["title", "pages"]));
    }
}
