//! `;`-separated table I/O shared by the reference loaders, the input
//! reader and the output writer.
//!
//! Field values are taken verbatim. Header names are matched exactly
//! (case-sensitive, no trimming). Output rows end with `\n`.

use csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::models::DerivedPair;

/// Field separator for every table this crate reads or writes.
pub const DELIMITER: u8 = b';';

/// Header row of the output table.
pub const OUTPUT_HEADER: [&str; 2] = ["ID3", "ID4"];

/// Reader settings for `;`-separated tables with a header row.
///
/// `flexible` allows rows whose field count differs from the header.
pub fn reader_builder(flexible: bool) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(flexible);
    builder
}

/// Position of a named column in a header row.
pub fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Incremental writer for the `ID3;ID4` output table.
///
/// The header is written on creation; pairs are appended in the order they
/// are handed over.
pub struct OutputWriter {
    path: PathBuf,
    writer: Writer<File>,
    rows: usize,
}

impl OutputWriter {
    /// Create (or truncate) the output file, creating parent directories.
    pub fn create(path: &Path) -> csv::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(OUTPUT_HEADER)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            rows: 0,
        })
    }

    pub fn write_pairs(&mut self, pairs: &[DerivedPair]) -> csv::Result<()> {
        for pair in pairs {
            self.writer.write_record([pair.id3.as_str(), pair.id4.as_str()])?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file, returning its size in bytes.
    pub fn finish(mut self) -> csv::Result<u64> {
        self.writer.flush()?;
        drop(self.writer);
        Ok(fs::metadata(&self.path)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_column_index_exact_match() {
        let headers = StringRecord::from(vec!["RecordID", "ID", "SomeData"]);
        assert_eq!(column_index(&headers, "ID"), Some(1));
        assert_eq!(column_index(&headers, "id"), None);
    }

    #[test]
    fn test_column_index_does_not_trim() {
        let headers = StringRecord::from(vec!["RecordID", " ID ", "SomeData"]);
        assert_eq!(column_index(&headers, "ID"), None);
    }

    #[test]
    fn test_reader_keeps_values_verbatim() {
        let data = "RecordID;ID;SomeData\n1;8d 7d 2c_Ah9h;Data_1\n";
        let mut reader = reader_builder(true).from_reader(data.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.get(1), Some("8d 7d 2c_Ah9h"));
    }

    #[test]
    fn test_flexible_reader_accepts_short_rows() {
        let data = "a;b;c\n1;2\n";
        let mut reader = reader_builder(true).from_reader(data.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(2), None);
    }

    #[test]
    fn test_output_writer_creates_dirs_and_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/result.csv");

        let mut writer = OutputWriter::create(&path).unwrap();
        writer
            .write_pairs(&[DerivedPair {
                id3: "Q1_XY99".into(),
                id4: "Q1_XY99AB12".into(),
            }])
            .unwrap();
        assert_eq!(writer.rows(), 1);
        let size = writer.finish().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ID3;ID4\nQ1_XY99;Q1_XY99AB12\n");
        assert_eq!(size, content.len() as u64);
    }

    #[test]
    fn test_output_writer_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("result.csv");
        fs::write(&path, "stale content\nmore\n").unwrap();

        OutputWriter::create(&path).unwrap().finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ID3;ID4\n");
    }
}
