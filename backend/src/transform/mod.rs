//! Identifier derivation and the batch run.
//!
//! - Derive: ID3/ID4 composition and deduplication
//! - Pipeline: file discovery, per-file processing, the full run

pub mod derive;
pub mod pipeline;

pub use derive::*;
pub use pipeline::*;
