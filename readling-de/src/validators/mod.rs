//! Decodability validation
//!
//! Scores words and full texts against a learner-specific taught/target
//! correspondence subset. This is the acceptance gate for generated stories:
//! a story passes only when its token-weighted decodability score reaches
//! the configured threshold.

pub mod decodability_scorer;

pub use decodability_scorer::{grapheme_set, DecodabilityScorer};
