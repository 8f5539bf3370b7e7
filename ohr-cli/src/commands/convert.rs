//! Convert command implementation

use super::{load, CatalogFormat};
use anyhow::{Context, Result};
use ohr_core::catalog::save_catalog;
use ohr_core::{write_catalog_json, DecodeOptions};
use std::fs;
use std::path::Path;

/// Convert a catalog between its XML and JSON representations
pub fn convert(input: &Path, output: &Path, format: &str, options: &DecodeOptions) -> Result<()> {
    let target = CatalogFormat::from_name(format)
        .with_context(|| format!("No encoder available for {} format", format))?;

    let catalog = load(input, options)?;

    match target {
        CatalogFormat::Xml => save_catalog(output, &catalog)
            .with_context(|| format!("Failed to write output file: {}", output.display()))?,
        CatalogFormat::Json => {
            let json = write_catalog_json(&catalog)?;
            fs::write(output, json)
                .with_context(|| format!("Failed to write output file: {}", output.display()))?;
        }
    }

    tracing::info!(
        "Converted '{}' with {} books -> {}",
        catalog.name(),
        catalog.book_count(),
        output.display()
    );

    println!("Converted {} -> {}", input.display(), output.display());

    Ok(())
}
