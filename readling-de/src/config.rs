//! Configuration resolution for readling-de
//!
//! Resolution priority per field: environment variable → TOML config file
//! (`~/.config/readling/readling-de.toml`, then `/etc/readling/`) →
//! compiled default. The generator API key is the only secret; it is
//! reported by source when found in more than one place so a stale TOML key
//! shadowed by an environment variable is visible in the logs.

use readling_common::{config as common_config, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Token-weighted score a draft must reach to be accepted.
pub const DEFAULT_DECODABILITY_THRESHOLD: f32 = 0.85;

/// How many generator calls one story may consume.
pub const DEFAULT_MAX_REGENERATION_ATTEMPTS: u32 = 3;

/// Per-attempt wall-clock budget for the collaborator round-trip.
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 90;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5740";
const DEFAULT_GENERATOR_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_GENERATOR_MODEL: &str = "gpt-4o-mini";

/// Text-generation collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// OpenAI-compatible chat completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API key; without one the /generate surface is disabled
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Prompt price in USD per 1K tokens, used when the API reports no cost
    #[serde(default)]
    pub prompt_price_per_1k: f64,
    /// Completion price in USD per 1K tokens, used when the API reports no cost
    #[serde(default)]
    pub completion_price_per_1k: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            prompt_price_per_1k: 0.0,
            completion_price_per_1k: 0.0,
        }
    }
}

/// Engine service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_threshold")]
    pub decodability_threshold: f32,
    #[serde(default = "default_max_attempts")]
    pub max_regeneration_attempts: u32,
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            decodability_threshold: default_threshold(),
            max_regeneration_attempts: default_max_attempts(),
            attempt_timeout_secs: default_attempt_timeout(),
            generator: GeneratorConfig::default(),
        }
    }
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_api_url() -> String {
    DEFAULT_GENERATOR_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_GENERATOR_MODEL.to_string()
}

fn default_threshold() -> f32 {
    DEFAULT_DECODABILITY_THRESHOLD
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_REGENERATION_ATTEMPTS
}

fn default_attempt_timeout() -> u64 {
    DEFAULT_ATTEMPT_TIMEOUT_SECS
}

impl EngineConfig {
    /// Load configuration: TOML file if present, then environment
    /// overrides on top.
    pub fn load() -> Result<Self> {
        let mut config: EngineConfig =
            common_config::load_config("readling-de")?.unwrap_or_default();
        config.apply_env();
        config.log_key_sources();
        Ok(config)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    /// Overlay environment variables onto the loaded values.
    fn apply_env(&mut self) {
        if let Ok(addr) = std::env::var("READLING_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("READLING_GENERATOR_API_URL") {
            self.generator.api_url = url;
        }
        if let Ok(model) = std::env::var("READLING_GENERATOR_MODEL") {
            self.generator.model = model;
        }
        if let Ok(key) = std::env::var("READLING_GENERATOR_API_KEY") {
            if is_valid_key(&key) {
                self.generator.api_key = Some(key);
            }
        }
        if let Ok(threshold) = std::env::var("READLING_DECODABILITY_THRESHOLD") {
            match threshold.parse::<f32>() {
                Ok(value) if (0.0..=1.0).contains(&value) => {
                    self.decodability_threshold = value;
                }
                _ => warn!(
                    "Ignoring invalid READLING_DECODABILITY_THRESHOLD: {}",
                    threshold
                ),
            }
        }
        if let Ok(attempts) = std::env::var("READLING_MAX_REGENERATION_ATTEMPTS") {
            match attempts.parse::<u32>() {
                Ok(value) if value >= 1 => self.max_regeneration_attempts = value,
                _ => warn!(
                    "Ignoring invalid READLING_MAX_REGENERATION_ATTEMPTS: {}",
                    attempts
                ),
            }
        }
    }

    /// Report where the generator key came from; warn when more than one
    /// source carries one (potential misconfiguration).
    fn log_key_sources(&self) {
        let env_key = std::env::var("READLING_GENERATOR_API_KEY")
            .ok()
            .filter(|k| is_valid_key(k));
        let have_config_key = self
            .generator
            .api_key
            .as_deref()
            .map(is_valid_key)
            .unwrap_or(false);

        match (env_key.is_some(), have_config_key) {
            (true, true) => {
                warn!(
                    "Generator API key found in environment and TOML. \
                     Using environment (highest priority)."
                );
            }
            (true, false) | (false, true) => {
                info!("Generator API key configured");
            }
            (false, false) => {
                info!(
                    "No generator API key configured; story generation disabled. \
                     Set READLING_GENERATOR_API_KEY or add generator.api_key to \
                     ~/.config/readling/readling-de.toml"
                );
            }
        }
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_values() {
        let config = EngineConfig::default();
        assert_eq!(config.decodability_threshold, 0.85);
        assert_eq!(config.max_regeneration_attempts, 3);
        assert_eq!(config.attempt_timeout_secs, 90);
        assert!(config.generator.api_key.is_none());
    }

    #[test]
    fn sparse_toml_fills_in_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            decodability_threshold = 0.9

            [generator]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        assert_eq!(config.decodability_threshold, 0.9);
        assert_eq!(config.generator.model, "gpt-4o");
        assert_eq!(config.max_regeneration_attempts, 3);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn env_overrides_toml_values() {
        std::env::set_var("READLING_GENERATOR_MODEL", "test-model");
        std::env::set_var("READLING_DECODABILITY_THRESHOLD", "0.75");

        let mut config: EngineConfig = toml::from_str(
            r#"
            decodability_threshold = 0.9

            [generator]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        config.apply_env();

        assert_eq!(config.generator.model, "test-model");
        assert_eq!(config.decodability_threshold, 0.75);

        std::env::remove_var("READLING_GENERATOR_MODEL");
        std::env::remove_var("READLING_DECODABILITY_THRESHOLD");
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        std::env::set_var("READLING_MAX_REGENERATION_ATTEMPTS", "zero");
        let mut config = EngineConfig::default();
        config.apply_env();
        assert_eq!(config.max_regeneration_attempts, 3);
        std::env::remove_var("READLING_MAX_REGENERATION_ATTEMPTS");
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(!is_valid_key("   "));
        assert!(is_valid_key("sk-test"));
    }
}
