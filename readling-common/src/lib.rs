//! # Readling Common Library
//!
//! Shared code for the Readling services including:
//! - Grapheme-phoneme correspondence (GPC) inventory and tricky-word set
//! - Decodability report types
//! - Story and phonics-fingerprint types
//! - Read-aloud assessment types
//! - Configuration loading
//!
//! The decodability engine (`readling-de`) produces the report and assessment
//! values defined here; the downstream product services (enrollment, reader
//! UI, knowledge tracing) consume them.

pub mod assessment;
pub mod config;
pub mod decodability;
pub mod error;
pub mod gpc;
pub mod story;

pub use error::{Error, Result};
pub use gpc::{Gpc, GpcInventory, TrickyWords};
