//! readling-de - Decodability Engine service
//!
//! Stateless HTTP service around the decodability engine: decomposition,
//! validation, read-aloud assessment, and story generation. Consumed by
//! the Readling product services; holds no database.

use anyhow::Result;
use readling_common::gpc::{GpcInventory, TrickyWords};
use readling_de::config::is_valid_key;
use readling_de::generation::{CompletionClient, StoryGenerator};
use readling_de::validators::DecodabilityScorer;
use readling_de::{build_router, AppState, EngineConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting readling-de (Decodability Engine)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = EngineConfig::load()?;

    // Default inventory and tricky words; per-tenant variants are different
    // constructions, not code changes.
    let inventory = Arc::new(GpcInventory::letters_and_sounds());
    let scorer = Arc::new(
        DecodabilityScorer::new(inventory, TrickyWords::default_set())
            .with_threshold(config.decodability_threshold),
    );
    info!(
        correspondences = scorer.inventory().len(),
        tricky_words = scorer.tricky_words().len(),
        threshold = scorer.threshold(),
        "Decodability scorer initialized"
    );

    let generator: Option<Arc<dyn StoryGenerator>> = config
        .generator
        .api_key
        .clone()
        .filter(|key| is_valid_key(key))
        .map(|key| {
            Arc::new(CompletionClient::new(&config.generator, key)) as Arc<dyn StoryGenerator>
        });
    if let Some(generator) = &generator {
        info!(model = generator.model(), "Story generation enabled");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(scorer, generator, Arc::new(config));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
