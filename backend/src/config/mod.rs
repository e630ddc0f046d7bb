//! Run configuration: the four paths plus the column names the loaders
//! and the input reader look for.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Header names expected in the reference tables and input files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Primary identifier column in every input file.
    pub input_id: String,
    /// Primary identifier column in the correspondence table.
    pub correspondence_id: String,
    /// Secondary identifier column in the correspondence table.
    pub correspondence_id2: String,
    pub filename: String,
    pub code: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            input_id: "ID".to_string(),
            correspondence_id: "id".to_string(),
            correspondence_id2: "ID2".to_string(),
            filename: "filename".to_string(),
            code: "code".to_string(),
        }
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub correspondence_path: PathBuf,
    pub codes_path: PathBuf,
    pub output_path: PathBuf,

    /// Extension of the input files to pick up (compared case-insensitively).
    pub input_extension: String,

    pub columns: ColumnNames,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/input"),
            correspondence_path: PathBuf::from("data/correspondence.csv"),
            codes_path: PathBuf::from("data/filename_codes.csv"),
            output_path: PathBuf::from("data/output/result.csv"),
            input_extension: "csv".to_string(),
            columns: ColumnNames::default(),
        }
    }
}

impl RunConfig {
    /// Config with the given paths and default column names.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        correspondence_path: impl Into<PathBuf>,
        codes_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            correspondence_path: correspondence_path.into(),
            codes_path: codes_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Config from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load from a JSON file. Missing fields fall back to the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
