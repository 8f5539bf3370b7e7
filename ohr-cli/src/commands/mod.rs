//! CLI command implementations

mod batch;
mod convert;
mod info;
mod tree;
mod validate;

pub use batch::batch;
pub use convert::convert;
pub use info::info;
pub use tree::tree;
pub use validate::validate;

use anyhow::{bail, Context, Result};
use ohr_core::catalog::load_catalog;
use ohr_core::{read_catalog_json_with, BookFolder, DecodeOptions};
use std::fs;
use std::path::Path;

/// Catalog representations the CLI reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CatalogFormat {
    Xml,
    Json,
}

impl CatalogFormat {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "xml" => Some(CatalogFormat::Xml),
            "json" => Some(CatalogFormat::Json),
            _ => None,
        }
    }

    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .context("Could not determine input file extension")?;

        match Self::from_name(ext) {
            Some(format) => Ok(format),
            None => bail!("Unsupported catalog format: .{}", ext),
        }
    }
}

/// Read a catalog from an XML or JSON file, chosen by extension
pub(crate) fn load(path: &Path, options: &DecodeOptions) -> Result<BookFolder> {
    let folder = match CatalogFormat::from_path(path)? {
        CatalogFormat::Xml => load_catalog(path, options)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?,
        CatalogFormat::Json => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            read_catalog_json_with(&json, options)
                .with_context(|| format!("Failed to read catalog {}", path.display()))?
        }
    };

    tracing::debug!(
        "Loaded '{}' with {} books in {} levels",
        folder.name(),
        folder.book_count(),
        folder.depth()
    );

    Ok(folder)
}
