//! Sample data generator.
//!
//! Writes a small data set in the layout the `run` command expects:
//!
//! ```text
//! <dir>/input/18%Ese21.csv ...   RecordID;ID;SomeData
//! <dir>/correspondence.csv       id;ID2
//! <dir>/filename_codes.csv       filename;code
//! <dir>/output/                  (empty)
//! ```
//!
//! Primary identifiers look like `8d 7d 2c_Ah9h`; each ID2 keeps the first
//! nine characters and appends `P000`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::parser::DELIMITER;

const HEX: &[u8] = b"0123456789abcdef";
const ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Upper bound on generated files; keeps the two code letters within A-Z.
pub const MAX_FILES: usize = 20;

/// Paths and counts of a generated data set.
#[derive(Debug, Clone, Serialize)]
pub struct DemoData {
    pub input_dir: PathBuf,
    pub correspondence_path: PathBuf,
    pub codes_path: PathBuf,
    pub output_dir: PathBuf,
    /// (file name, code) for every input file
    pub files: Vec<(String, String)>,
    pub total_ids: usize,
}

fn pick(rng: &mut impl Rng, alphabet: &[u8], count: usize) -> String {
    (0..count)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Random primary identifier, e.g. `8d 7d 2c_Ah9h`.
pub fn random_id(rng: &mut impl Rng) -> String {
    format!(
        "{} {} {}_{}{}",
        pick(rng, HEX, 2),
        pick(rng, HEX, 2),
        pick(rng, HEX, 2),
        pick(rng, ALNUM, 2),
        pick(rng, ALNUM, 2),
    )
}

/// Secondary identifier for a generated primary identifier.
pub fn id2_from_id(id: &str) -> String {
    let prefix: String = id.chars().take(9).collect();
    format!("{prefix}P000")
}

/// File name and code for the `index`-th generated file:
/// `18%Ese21.csv`/`AF21`, `19%Ese22.csv`/`BG22`, ...
///
/// `None` from [`MAX_FILES`] on, where the second letter would leave A-Z.
pub fn file_name_and_code(index: usize) -> Option<(String, String)> {
    if index >= MAX_FILES {
        return None;
    }
    let first = (b'A' + index as u8) as char;
    let second = (b'F' + index as u8) as char;
    Some((
        format!("{}%Ese{}.csv", 18 + index, 21 + index),
        format!("{}{}{}", first, second, 21 + index),
    ))
}

/// Generate `files` input files of `rows` records each under `dir`.
///
/// `files` is capped at [`MAX_FILES`]. The same `seed` produces the same data.
pub fn generate_demo_data(dir: &Path, files: usize, rows: usize, seed: u64) -> csv::Result<DemoData> {
    let mut rng = StdRng::seed_from_u64(seed);

    let input_dir = dir.join("input");
    let output_dir = dir.join("output");
    fs::create_dir_all(&input_dir)?;
    fs::create_dir_all(&output_dir)?;

    let mut all_ids = Vec::new();
    let mut generated = Vec::new();

    for (file_name, code) in (0..files).map_while(file_name_and_code) {
        let ids: Vec<String> = (0..rows).map(|_| random_id(&mut rng)).collect();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_path(input_dir.join(&file_name))?;
        writer.write_record(["RecordID", "ID", "SomeData"])?;
        for (idx, id) in ids.iter().enumerate() {
            let record_id = (idx + 1).to_string();
            let data = format!("Data_{}", idx + 1);
            writer.write_record([record_id.as_str(), id.as_str(), data.as_str()])?;
        }
        writer.flush()?;

        all_ids.extend(ids);
        generated.push((file_name, code));
    }

    let correspondence_path = dir.join("correspondence.csv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(&correspondence_path)?;
    writer.write_record(["id", "ID2"])?;
    for id in &all_ids {
        writer.write_record([id.as_str(), id2_from_id(id).as_str()])?;
    }
    writer.flush()?;

    let codes_path = dir.join("filename_codes.csv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(&codes_path)?;
    writer.write_record(["filename", "code"])?;
    for (file_name, code) in &generated {
        writer.write_record([file_name.as_str(), code.as_str()])?;
    }
    writer.flush()?;

    Ok(DemoData {
        input_dir,
        correspondence_path,
        codes_path,
        output_dir,
        files: generated,
        total_ids: all_ids.len(),
    })
}
