//! Loaders for the two reference tables.
//!
//! Both tables are `;`-separated with a header row. Any failure to open,
//! parse, or find the key/value columns is a [`ReferenceError`]; there is
//! no partial load.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::ColumnNames;
use crate::error::{ReferenceError, ReferenceResult};
use crate::models::{CorrespondenceTable, FilenameCodeTable, LookupTable};
use crate::parser::{column_index, reader_builder};

/// Load the ID to ID2 correspondence table.
pub fn load_correspondence(path: &Path, columns: &ColumnNames) -> ReferenceResult<CorrespondenceTable> {
    load_lookup(path, &columns.correspondence_id, &columns.correspondence_id2).map(Into::into)
}

/// Load the filename to code table.
pub fn load_filename_codes(path: &Path, columns: &ColumnNames) -> ReferenceResult<FilenameCodeTable> {
    load_lookup(path, &columns.filename, &columns.code).map(Into::into)
}

/// Read two named columns of a table into a [`LookupTable`].
pub fn load_lookup(path: &Path, key_column: &str, value_column: &str) -> ReferenceResult<LookupTable> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ReferenceError::NotFound { path: path.to_path_buf() },
        _ => ReferenceError::Io { path: path.to_path_buf(), source },
    })?;

    let malformed = |source| ReferenceError::Malformed { path: path.to_path_buf(), source };
    let missing = |column: &str| ReferenceError::MissingColumn {
        path: path.to_path_buf(),
        column: column.to_string(),
    };

    let mut reader = reader_builder(true).from_reader(file);
    let headers = reader.headers().map_err(malformed)?.clone();
    let key_idx = column_index(&headers, key_column).ok_or_else(|| missing(key_column))?;
    let value_idx = column_index(&headers, value_column).ok_or_else(|| missing(value_column))?;

    let mut table = LookupTable::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(malformed)?;
        // Extra trailing fields are ignored; a missing key or value is not.
        let field = |i: usize, column: &str| {
            record.get(i).ok_or_else(|| ReferenceError::IncompleteRow {
                path: path.to_path_buf(),
                line: idx + 2,
                column: column.to_string(),
            })
        };
        let key = field(key_idx, key_column)?;
        let value = field(value_idx, value_column)?;
        table.insert(key, value);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_correspondence() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "corr.csv", "id;ID2\nAB12;XY99\n8d 7d 2c_Ah9h;8d 7d 2c_P000\n");

        let table = load_correspondence(&path, &ColumnNames::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.secondary_id("AB12"), Some("XY99"));
        assert_eq!(table.secondary_id("8d 7d 2c_Ah9h"), Some("8d 7d 2c_P000"));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "codes.csv", "code;filename\nQ1;f1.csv\n");

        let table = load_filename_codes(&path, &ColumnNames::default()).unwrap();
        assert_eq!(table.code_for("f1.csv"), Some("Q1"));
    }

    #[test]
    fn test_duplicate_keys_keep_last() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "corr.csv", "id;ID2\nA;first\nA;second\n");

        let table = load_correspondence(&path, &ColumnNames::default()).unwrap();
        assert_eq!(table.secondary_id("A"), Some("second"));
        assert_eq!(table.overwritten(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_filename_codes(&dir.path().join("nope.csv"), &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, ReferenceError::NotFound { .. }));
    }

    #[test]
    fn test_missing_column_is_case_sensitive() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "corr.csv", "ID;ID2\nAB12;XY99\n");

        let err = load_correspondence(&path, &ColumnNames::default()).unwrap_err();
        match err {
            ReferenceError::MissingColumn { column, .. } => assert_eq!(column, "id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_file_lacks_columns() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "codes.csv", "");

        let err = load_filename_codes(&path, &ColumnNames::default()).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingColumn { .. }));
    }

    #[test]
    fn test_extra_trailing_field_is_ignored() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "corr.csv", "id;ID2\nAB12;XY99\nCD34;ZZ01;note\n");

        let table = load_correspondence(&path, &ColumnNames::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.secondary_id("AB12"), Some("XY99"));
        assert_eq!(table.secondary_id("CD34"), Some("ZZ01"));
    }

    #[test]
    fn test_short_row_missing_value() {
        let dir = tempdir().unwrap();
        let path = write(dir.path(), "codes.csv", "filename;code\nf1.csv;Q1\nf2.csv\n");

        let err = load_filename_codes(&path, &ColumnNames::default()).unwrap_err();
        match err {
            ReferenceError::IncompleteRow { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "code");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
