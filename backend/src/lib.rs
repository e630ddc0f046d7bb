//! # idmap - Batch identifier mapper
//!
//! Reads per-source CSV extracts and produces one deduplicated table that
//! maps a derived composite key (ID3) to a derived value (ID4).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ correspondence + │──▶│  input/*.csv │──▶│ derive+dedup │──▶│ ID3;ID4 CSV │
//! │ filename codes   │   │ (name order) │   │  (run-wide)  │   │ (one table) │
//! └──────────────────┘   └──────────────┘   └──────────────┘   └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use idmap::{run, RunConfig, TracingSink};
//!
//! let config = RunConfig::new("data/input", "data/correspondence.csv",
//!                             "data/filename_codes.csv", "data/output/result.csv");
//! let summary = run(&config, &TracingSink)?;
//! println!("Wrote {} records", summary.records_written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`models`] - Lookup tables, derived pairs, outcomes
//! - [`parser`] - `;`-separated table reading and writing
//! - [`reference`] - Correspondence and filename-code loaders
//! - [`transform`] - Derivation and the batch run
//! - [`config`] - Run configuration
//! - [`logs`] - Injectable log sinks
//! - [`demo`] - Sample data generator

// Core modules
pub mod error;
pub mod models;

// Table I/O
pub mod parser;
pub mod reference;

// Derivation and run
pub mod transform;

// Ambient
pub mod config;
pub mod logs;

// Sample data
pub mod demo;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ConfigError,
    InputError,
    MapperError,
    MapperResult,
    ReferenceError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CorrespondenceTable,
    FilenameCodeTable,
    LookupTable,
    DerivedPair,
    SeenKeys,
    DeriveOutcome,
    FileOutcome,
    FileReport,
};

// =============================================================================
// Re-exports - Loading and run
// =============================================================================

pub use reference::{load_correspondence, load_filename_codes};

pub use transform::{
    compose_id3,
    compose_id4,
    derive_identifier_pair,
    discover_input_files,
    process_file,
    run,
    RunSummary,
};

pub use config::{ColumnNames, RunConfig};

pub use logs::{LogEntry, LogLevel, LogSink, MemorySink, NullSink, TracingSink};

pub use demo::generate_demo_data;
