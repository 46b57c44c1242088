//! Grapheme-phoneme decomposition
//!
//! The decomposer maps a single token onto the ordered correspondences of an
//! injected inventory. It is total: any string decomposes, degrading to
//! synthetic letter-by-letter correspondences for spellings the inventory
//! does not cover.

pub mod decomposer;

pub use decomposer::WordDecomposer;
