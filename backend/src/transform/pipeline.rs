//! Batch run: load the reference tables, walk the input files, write the
//! deduplicated `ID3;ID4` table.
//!
//! # Example
//!
//! ```rust,ignore
//! use idmap::{run, RunConfig, TracingSink};
//!
//! let summary = run(&RunConfig::default(), &TracingSink)?;
//! println!("{} unique records", summary.records_written);
//! ```
//!
//! Files are processed in lexicographic name order, so the output only
//! depends on the file contents and names. Output is written incrementally,
//! one file at a time: if a later input file fails, the output file keeps
//! the header and every pair from the files before it.

use csv::StringRecord;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::derive::derive_identifier_pair;
use crate::config::RunConfig;
use crate::error::{InputError, InputResult, MapperError, MapperResult};
use crate::logs::LogSink;
use crate::models::{
    CorrespondenceTable, DeriveOutcome, FileOutcome, FileReport, FilenameCodeTable, SeenKeys,
};
use crate::parser::{column_index, reader_builder, OutputWriter};
use crate::reference::{load_correspondence, load_filename_codes};

/// Statistics for a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub files_discovered: usize,
    pub files_processed: usize,
    /// Names of files skipped because they have no code.
    pub skipped_files: Vec<String>,
    pub rows_read: usize,
    pub records_written: usize,
    pub unresolved: usize,
    pub duplicates: usize,
    pub output_path: PathBuf,
    pub output_bytes: u64,
    pub files: Vec<FileReport>,
    /// RFC 3339 completion time
    pub finished_at: String,
}

impl RunSummary {
    fn new(files_discovered: usize, output_path: &Path) -> Self {
        Self {
            files_discovered,
            files_processed: 0,
            skipped_files: Vec::new(),
            rows_read: 0,
            records_written: 0,
            unresolved: 0,
            duplicates: 0,
            output_path: output_path.to_path_buf(),
            output_bytes: 0,
            files: Vec::new(),
            finished_at: String::new(),
        }
    }

    fn record(&mut self, report: FileReport) {
        self.files_processed += 1;
        self.rows_read += report.rows_read;
        self.unresolved += report.unresolved;
        self.duplicates += report.duplicates;
        self.files.push(report);
    }
}

/// List the input files in `dir` whose extension matches, sorted by name.
///
/// Sub-directories are ignored.
pub fn discover_input_files(dir: &Path, extension: &str) -> MapperResult<Vec<PathBuf>> {
    let discover_err = |source| MapperError::Discover {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(discover_err)? {
        let path = entry.map_err(discover_err)?.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Process one input file.
///
/// The file's name selects its code; an unmapped name skips the whole file.
/// Rows are derived in file order and share `seen` with every other file of
/// the run. An empty file (no header) yields no rows.
pub fn process_file(
    path: &Path,
    codes: &FilenameCodeTable,
    correspondence: &CorrespondenceTable,
    seen: &mut SeenKeys,
    id_column: &str,
    log: &dyn LogSink,
) -> InputResult<FileOutcome> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log.info(format!("📄 Processing file: {}", file_name));

    let Some(code) = codes.code_for(&file_name) else {
        log.warning(format!("Code for file {} not found, skipping", file_name));
        return Ok(FileOutcome::SkippedUnmapped { file_name });
    };

    let malformed = |source| InputError::Malformed {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = reader_builder(true).from_reader(file);
    let headers = reader.headers().map_err(malformed)?.clone();

    let mut report = FileReport {
        file_name: file_name.clone(),
        code: code.to_string(),
        ..FileReport::default()
    };

    if headers.is_empty() {
        log.warning(format!("File {} is empty", file_name));
        return Ok(FileOutcome::Processed(report));
    }

    let id_idx = column_index(&headers, id_column).ok_or_else(|| InputError::MissingColumn {
        path: path.to_path_buf(),
        column: id_column.to_string(),
    })?;

    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(malformed)? {
        report.rows_read += 1;
        let row_num = report.rows_read;

        let Some(primary_id) = record.get(id_idx) else {
            log.warning(format!("Row {} has no '{}' value", row_num, id_column));
            report.unresolved += 1;
            continue;
        };

        match derive_identifier_pair(primary_id, code, correspondence, seen) {
            DeriveOutcome::Emitted(pair) => {
                log.debug(format!("Processed record {}: {} → {}", row_num, pair.id3, pair.id4));
                report.pairs.push(pair);
            }
            DeriveOutcome::Unresolved => {
                log.warning(format!("ID '{}' not found in correspondence table", primary_id));
                report.unresolved += 1;
            }
            DeriveOutcome::Duplicate { id3 } => {
                log.debug(format!("ID3 '{}' already processed, skipping", id3));
                report.duplicates += 1;
            }
        }
    }

    report.emitted = report.pairs.len();
    log.success_indent(
        format!("File {}: processed {} new records", file_name, report.emitted),
        1,
    );
    Ok(FileOutcome::Processed(report))
}

/// Run the whole conversion described by `config`.
///
/// Reference tables are loaded before the output file is touched, so a
/// [`MapperError::Reference`] never leaves an output behind. An existing
/// output file is overwritten.
pub fn run(config: &RunConfig, log: &dyn LogSink) -> MapperResult<RunSummary> {
    log.info("🚀 Starting processing");

    log.info(format!(
        "📖 Loading correspondence table: {}",
        config.correspondence_path.display()
    ));
    let correspondence = load_correspondence(&config.correspondence_path, &config.columns)?;
    log.success(format!("Loaded {} ID → ID2 correspondences", correspondence.len()));
    if correspondence.overwritten() > 0 {
        log.warning(format!(
            "{} duplicate IDs in correspondence table, last value kept",
            correspondence.overwritten()
        ));
    }

    log.info(format!("📖 Loading file codes: {}", config.codes_path.display()));
    let codes = load_filename_codes(&config.codes_path, &config.columns)?;
    log.success(format!("Loaded {} file codes", codes.len()));
    if codes.overwritten() > 0 {
        log.warning(format!(
            "{} duplicate file names in codes table, last value kept",
            codes.overwritten()
        ));
    }

    let files = discover_input_files(&config.input_dir, &config.input_extension)?;
    log.info(format!("📁 Found {} input files", files.len()));
    if files.is_empty() {
        log.warning("No files to process");
    }

    let output_err = |source| MapperError::Output {
        path: config.output_path.clone(),
        source,
    };

    log.info(format!("📝 Creating output file: {}", config.output_path.display()));
    let mut output = OutputWriter::create(&config.output_path).map_err(output_err)?;

    let mut seen = SeenKeys::new();
    let mut summary = RunSummary::new(files.len(), &config.output_path);

    for path in &files {
        let outcome = process_file(
            path,
            &codes,
            &correspondence,
            &mut seen,
            &config.columns.input_id,
            log,
        )?;
        output.write_pairs(outcome.pairs()).map_err(output_err)?;

        match outcome {
            FileOutcome::Processed(report) => summary.record(report),
            FileOutcome::SkippedUnmapped { file_name } => summary.skipped_files.push(file_name),
        }
    }

    summary.records_written = output.rows();
    summary.output_bytes = output.finish().map_err(output_err)?;
    summary.finished_at = chrono::Utc::now().to_rfc3339();

    log.success("✅ Processing completed");
    log.info("📊 Statistics:");
    log.info_indent(format!("Files processed: {}", summary.files_processed), 1);
    log.info_indent(format!("Files skipped: {}", summary.skipped_files.len()), 1);
    log.info_indent(format!("Unique records: {}", summary.records_written), 1);
    log.info_indent(format!("Unresolved IDs: {}", summary.unresolved), 1);
    log.info_indent(format!("Duplicates: {}", summary.duplicates), 1);
    log.info_indent(format!("Output file: {}", summary.output_path.display()), 1);
    log.info_indent(format!("File size: {} bytes", summary.output_bytes), 1);

    Ok(summary)
}
