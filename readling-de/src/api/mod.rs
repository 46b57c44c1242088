//! HTTP API surface for the decodability engine
//!
//! JSON in, JSON out, stateless. The product services call these routes;
//! the engine holds no sessions and persists nothing.

pub mod assessment;
pub mod decodability;
pub mod generation;
pub mod health;

pub use assessment::assess_reading;
pub use decodability::{decompose_word, validate_text};
pub use generation::generate_story;
pub use health::health_check;
