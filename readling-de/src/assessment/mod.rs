//! Read-aloud assessment
//!
//! Aligns an expected word sequence against a transcribed spoken sequence,
//! classifies each mismatch, and aggregates correspondence-level error
//! rates for the knowledge-tracing service. Pure and synchronous; no audio
//! ever reaches this module.

pub mod aligner;
pub mod reading_assessor;

pub use aligner::{align, AlignedPair};
pub use reading_assessor::assess;
