//! Ohr CLI - Command-line interface for library catalogs

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ohr_core::catalog::DEFAULT_MAX_DEPTH;
use ohr_core::DecodeOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "ohr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Deepest folder nesting accepted when reading catalogs
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Read book names from the legacy `type` attribute
    #[arg(long, global = true)]
    legacy_names: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display summary information about a catalog
    Info {
        /// Input catalog path (.xml or .json)
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the folder tree of a catalog
    Tree {
        /// Input catalog path (.xml or .json)
        input: PathBuf,
    },

    /// Validate a catalog file
    Validate {
        /// Input catalog path (.xml or .json)
        input: PathBuf,

        /// Also require SHA-512 sized hashes and at least one file per book
        #[arg(long)]
        strict: bool,
    },

    /// Convert a catalog between XML and JSON
    Convert {
        /// Input catalog path (.xml or .json)
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (xml, json)
        #[arg(short, long, default_value = "json")]
        format: String,
    },

    /// Batch validate every .xml and .json catalog in a directory
    Batch {
        /// Input directory
        input_dir: PathBuf,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,

        /// Apply strict validation to every catalog
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "ohr_cli=debug,ohr_core=debug"
    } else {
        "ohr_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = DecodeOptions::default()
        .with_max_depth(cli.max_depth)
        .with_legacy_name_attribute(cli.legacy_names);

    match cli.command {
        Commands::Info { input, json } => commands::info(&input, json, &options),

        Commands::Tree { input } => commands::tree(&input, &options),

        Commands::Validate { input, strict } => commands::validate(&input, strict, &options),

        Commands::Convert {
            input,
            output,
            format,
        } => commands::convert(&input, &output, &format, &options),

        Commands::Batch {
            input_dir,
            jobs,
            strict,
        } => commands::batch(&input_dir, jobs, strict, &options),
    }
}
