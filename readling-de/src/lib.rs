//! readling-de - Decodability Engine
//!
//! The core that backs Readling's one user-facing guarantee: a story is
//! provably readable by a specific child. Four pieces:
//!
//! - `phonics` - grapheme-phoneme decomposition over an injected inventory
//! - `validators` - word/text decodability scoring against a taught set
//! - `generation` - the bounded generate-validate-regenerate loop around
//!   the external text-generation collaborator
//! - `assessment` - read-aloud alignment and error classification
//!
//! The decomposer, scorer, and assessor are pure and synchronous; the
//! generation loop is the only I/O performer. The `api` module exposes the
//! engine over HTTP for the product services.

pub mod api;
pub mod assessment;
pub mod config;
pub mod error;
pub mod generation;
pub mod phonics;
pub mod validators;

pub use crate::config::EngineConfig;
pub use crate::error::{EngineError, EngineResult};

use crate::generation::StoryGenerator;
use crate::validators::DecodabilityScorer;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Shared scorer (owns the decomposer, inventory, and tricky words)
    pub scorer: Arc<DecodabilityScorer>,
    /// Configured text-generation collaborator, if any; absent disables
    /// the /generate surface
    pub generator: Option<Arc<dyn StoryGenerator>>,
    pub config: Arc<EngineConfig>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        scorer: Arc<DecodabilityScorer>,
        generator: Option<Arc<dyn StoryGenerator>>,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            scorer,
            generator,
            config,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(api::health_check))
        .route("/decompose", post(api::decompose_word))
        .route("/validate", post(api::validate_text))
        .route("/assess", post(api::assess_reading))
        .route("/generate", post(api::generate_story))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
