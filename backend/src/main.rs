//! idmap CLI - Map per-source CSV extracts to one ID3;ID4 table
//!
//! # Main Commands
//!
//! ```bash
//! idmap run                          # data/input -> data/output/result.csv
//! idmap run --config idmap.json      # paths and column names from JSON
//! idmap generate --dir data          # write sample input data
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! idmap derive "8d 7d 2c_Ah9h" --code AF21   # derive a single pair
//! idmap derive AB12 --code Q1 --config idmap.json
//! ```

use clap::{Parser, Subcommand};
use idmap::{
    derive_identifier_pair, generate_demo_data, load_correspondence, run, DeriveOutcome,
    RunConfig, SeenKeys, TracingSink,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "idmap")]
#[command(about = "Derive a deduplicated ID3;ID4 table from per-source CSV extracts", long_about = None)]
struct Cli {
    /// Log every record, not just per-file progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every input file and write the output table
    Run {
        /// JSON config file (flags below override it)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory with the input extracts
        #[arg(short, long, env = "IDMAP_INPUT_DIR")]
        input_dir: Option<PathBuf>,

        /// ID -> ID2 correspondence table
        #[arg(long, env = "IDMAP_CORRESPONDENCE")]
        correspondence: Option<PathBuf>,

        /// filename -> code table
        #[arg(long, env = "IDMAP_CODES")]
        codes: Option<PathBuf>,

        /// Output table (overwritten)
        #[arg(short, long, env = "IDMAP_OUTPUT")]
        output: Option<PathBuf>,

        /// Write the run statistics as JSON
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Derive the ID3;ID4 pair for a single primary identifier
    Derive {
        /// Primary identifier
        id: String,

        /// File code
        #[arg(short, long)]
        code: String,

        /// JSON config file for the table path and column names
        #[arg(long)]
        config: Option<PathBuf>,

        /// ID -> ID2 correspondence table (overrides the config)
        #[arg(long, env = "IDMAP_CORRESPONDENCE")]
        correspondence: Option<PathBuf>,
    },

    /// Generate sample input data
    Generate {
        /// Target directory
        #[arg(short, long, default_value = "data")]
        dir: PathBuf,

        /// Number of input files (max 20)
        #[arg(long, default_value = "5")]
        files: usize,

        /// Records per input file
        #[arg(long, default_value = "20")]
        rows: usize,

        /// RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = idmap::logs::init_tracing(cli.verbose, cli.log_file.as_deref());

    let result = match cli.command {
        Commands::Run {
            config,
            input_dir,
            correspondence,
            codes,
            output,
            summary,
        } => cmd_run(
            config.as_deref(),
            input_dir,
            correspondence,
            codes,
            output,
            summary.as_deref(),
        ),

        Commands::Derive {
            id,
            code,
            config,
            correspondence,
        } => cmd_derive(&id, &code, config.as_deref(), correspondence),

        Commands::Generate {
            dir,
            files,
            rows,
            seed,
        } => cmd_generate(&dir, files, rows, seed),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_run(
    config_path: Option<&Path>,
    input_dir: Option<PathBuf>,
    correspondence: Option<PathBuf>,
    codes: Option<PathBuf>,
    output: Option<PathBuf>,
    summary_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RunConfig::load(config_path)?;
    if let Some(dir) = input_dir {
        config.input_dir = dir;
    }
    if let Some(path) = correspondence {
        config.correspondence_path = path;
    }
    if let Some(path) = codes {
        config.codes_path = path;
    }
    if let Some(path) = output {
        config.output_path = path;
    }

    let summary = run(&config, &TracingSink)?;

    if let Some(path) = summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)?;
        eprintln!("💾 Summary written to: {}", path.display());
    }

    eprintln!("\n✨ Done! {} unique records", summary.records_written);
    Ok(())
}

fn cmd_derive(
    id: &str,
    code: &str,
    config_path: Option<&Path>,
    correspondence: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RunConfig::load(config_path)?;
    if let Some(path) = correspondence {
        config.correspondence_path = path;
    }
    let correspondence = load_correspondence(&config.correspondence_path, &config.columns)?;

    let mut seen = SeenKeys::new();
    match derive_identifier_pair(id, code, &correspondence, &mut seen) {
        DeriveOutcome::Emitted(pair) => println!("{};{}", pair.id3, pair.id4),
        DeriveOutcome::Unresolved => {
            return Err(format!("ID '{}' not found in correspondence table", id).into());
        }
        DeriveOutcome::Duplicate { id3 } => {
            return Err(format!("ID3 '{}' already processed", id3).into());
        }
    }

    Ok(())
}

fn cmd_generate(dir: &Path, files: usize, rows: usize, seed: u64) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔧 Generating sample data in: {}", dir.display());

    let data = generate_demo_data(dir, files, rows, seed)?;
    for (file_name, code) in &data.files {
        eprintln!("   ✅ {} ({} records, code {})", file_name, rows, code);
    }
    eprintln!("   Correspondence table: {} ({} records)", data.correspondence_path.display(), data.total_ids);
    eprintln!("   File codes: {}", data.codes_path.display());
    eprintln!("   Output folder: {}", data.output_dir.display());

    eprintln!("\n✨ Done!");
    Ok(())
}
