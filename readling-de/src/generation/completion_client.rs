//! Chat-completions client
//!
//! Talks to an OpenAI-compatible chat completions endpoint. The response
//! schema travels inside the user message and the request pins JSON output
//! mode, which is the widest-compatibility way to get structured drafts out
//! of these APIs.
//!
//! Cost: the client prefers a cost figure reported by the API (OpenRouter
//! puts one in `usage.cost`) and otherwise derives one from token counts
//! and the configured per-1K prices.

use crate::config::GeneratorConfig;
use crate::generation::generator::{GeneratedDraft, GeneratorError, StoryDraft, StoryGenerator};
use crate::generation::prompt::StoryPrompt;
use readling_common::story::GenerationCost;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Hard ceiling on the HTTP round-trip; the loop applies its own
/// per-attempt budget on top.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
    /// OpenRouter extension: spend in USD for this call
    #[serde(default)]
    cost: Option<f64>,
}

/// OpenAI-compatible chat-completions collaborator.
pub struct CompletionClient {
    http_client: Client,
    api_url: String,
    api_key: String,
    model: String,
    prompt_price_per_1k: f64,
    completion_price_per_1k: f64,
}

impl CompletionClient {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            prompt_price_per_1k: config.prompt_price_per_1k,
            completion_price_per_1k: config.completion_price_per_1k,
        }
    }

    fn cost_of(&self, usage: Option<CompletionUsage>) -> GenerationCost {
        let Some(usage) = usage else {
            return GenerationCost::default();
        };
        let total_usd = usage.cost.unwrap_or_else(|| {
            usage.prompt_tokens as f64 / 1000.0 * self.prompt_price_per_1k
                + usage.completion_tokens as f64 / 1000.0 * self.completion_price_per_1k
        });
        GenerationCost {
            total_usd,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }
    }
}

#[async_trait::async_trait]
impl StoryGenerator for CompletionClient {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &StoryPrompt) -> Result<GeneratedDraft, GeneratorError> {
        let user_message = format!(
            "{}\n\nRespond with a single JSON object matching this schema:\n{}",
            prompt.user, prompt.response_schema
        );

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": user_message },
            ],
            "response_format": { "type": "json_object" },
        });

        debug!(model = %self.model, url = %self.api_url, "Requesting story draft");

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else {
                    GeneratorError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        if !status.is_success() {
            let snippet: String = text.chars().take(300).collect();
            return Err(GeneratorError::Api(format!("{}: {}", status, snippet)));
        }

        let completion: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| GeneratorError::Parse(format!("completion envelope: {}", e)))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| GeneratorError::Parse("no choices in response".to_string()))?;

        let draft: StoryDraft = serde_json::from_str(content)
            .map_err(|e| GeneratorError::Parse(format!("draft body: {}", e)))?;

        if draft.pages.is_empty() {
            return Err(GeneratorError::Parse("draft has no pages".to_string()));
        }

        debug!(
            title = %draft.title,
            pages = draft.pages.len(),
            "Received story draft"
        );

        Ok(GeneratedDraft {
            cost: self.cost_of(completion.usage),
            draft,
        })
    }
}
