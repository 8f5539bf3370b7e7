//! Batch validation command implementation

use super::validate::strict_problems;
use super::{load, CatalogFormat};
use anyhow::{bail, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ohr_core::DecodeOptions;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Validate every `.xml` and `.json` catalog in a directory in parallel
pub fn batch(input_dir: &Path, jobs: usize, strict: bool, options: &DecodeOptions) -> Result<()> {
    // Find all catalog files
    let mut files: Vec<_> = fs::read_dir(input_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|ext| CatalogFormat::from_name(ext).is_some())
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No catalog files found in {}", input_dir.display());
        return Ok(());
    }

    println!("Found {} catalogs to validate", files.len());

    // Set up progress tracking
    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let valid_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    // Configure thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .ok(); // Ignore if already configured

    // Validate files in parallel
    files.par_iter().for_each(|file_path| {
        match check_file(file_path, strict, options) {
            Ok(_) => {
                valid_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Invalid catalog {:?}: {:#}", file_path, e);
            }
        }

        overall_pb.inc(1);
    });

    overall_pb.finish();

    let valid = valid_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nBatch validation complete:");
    println!("  Valid:   {}", valid);
    println!("  Invalid: {}", errors);

    if errors > 0 {
        bail!("Batch validation found {} invalid catalogs", errors);
    }

    Ok(())
}

fn check_file(path: &Path, strict: bool, options: &DecodeOptions) -> Result<()> {
    let catalog = load(path, options)?;

    if strict {
        let problems = strict_problems(&catalog);
        if !problems.is_empty() {
            bail!("{}", problems.join("; "));
        }
    }

    tracing::info!("Validated {:?}: {} books", path, catalog.book_count());

    Ok(())
}
