//! Error types for the identifier mapping run.
//!
//! This module defines one error type per layer:
//!
//! - [`ReferenceError`] - loading the correspondence and filename-code tables
//! - [`InputError`] - reading an individual input extract
//! - [`ConfigError`] - loading a JSON run configuration
//! - [`MapperError`] - top-level run errors
//!
//! Everything here is fatal. Skipped rows and skipped files are not errors,
//! they are reported through [`crate::models::DeriveOutcome`] and
//! [`crate::models::FileOutcome`].

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Reference Table Errors
// =============================================================================

/// A required lookup table is absent, unreadable or lacks expected columns.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// The file does not exist.
    #[error("Reference table not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be opened.
    #[error("Cannot open reference table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid `;`-separated table.
    #[error("Malformed reference table {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row does not contain a required column.
    #[error("Reference table {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// A data row is too short to hold the key or value column.
    #[error("Reference table {} line {line} has no '{column}' value", path.display())]
    IncompleteRow {
        path: PathBuf,
        line: usize,
        column: String,
    },
}

// =============================================================================
// Input File Errors
// =============================================================================

/// Failure while reading one of the input extracts.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be opened.
    #[error("Cannot open input file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be read.
    #[error("Malformed input file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row has no primary identifier column.
    #[error("Input file {} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors loading a [`crate::config::RunConfig`] from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// =============================================================================
// Run Errors (top-level)
// =============================================================================

/// Top-level error returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum MapperError {
    /// A reference table could not be loaded. Nothing has been written yet.
    #[error("Missing reference data: {0}")]
    Reference(#[from] ReferenceError),

    /// An input file failed mid-run. The output may be truncated.
    #[error("Input failure: {0}")]
    Input(#[from] InputError),

    /// The input directory could not be listed.
    #[error("Cannot list input directory {}: {source}", path.display())]
    Discover {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output table could not be created or written.
    #[error("Cannot write output {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for reference table loading.
pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Result type for reading input files.
pub type InputResult<T> = Result<T, InputError>;

/// Result type for a whole run.
pub type MapperResult<T> = Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_converts_to_mapper_error() {
        let err = ReferenceError::MissingColumn {
            path: PathBuf::from("data/correspondence.csv"),
            column: "ID2".into(),
        };
        let mapper_err: MapperError = err.into();
        let msg = mapper_err.to_string();
        assert!(msg.starts_with("Missing reference data"));
        assert!(msg.contains("ID2"));
        assert!(msg.contains("correspondence.csv"));
    }

    #[test]
    fn test_input_error_format() {
        let err = InputError::MissingColumn {
            path: PathBuf::from("data/input/a.csv"),
            column: "ID".into(),
        };
        let mapper_err: MapperError = err.into();
        assert!(mapper_err.to_string().contains("a.csv"));
        assert!(mapper_err.to_string().contains("'ID'"));
    }
}
