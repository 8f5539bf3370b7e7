//! Info command implementation

use super::load;
use anyhow::Result;
use ohr_core::DecodeOptions;
use serde::Serialize;
use std::path::Path;

/// Catalog info output
#[derive(Serialize)]
struct CatalogInfo {
    name: String,
    folders: usize,
    books: usize,
    depth: usize,
    total_size: u64,
}

/// Display summary information about a catalog
pub fn info(input: &Path, json: bool, options: &DecodeOptions) -> Result<()> {
    let catalog = load(input, options)?;

    let info = CatalogInfo {
        name: catalog.name().to_string(),
        folders: catalog.walk().count(),
        books: catalog.book_count(),
        depth: catalog.depth(),
        total_size: catalog.total_size(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Name:       {}", info.name);
        println!("Folders:    {}", info.folders);
        println!("Books:      {}", info.books);
        println!("Depth:      {}", info.depth);
        println!("Total size: {} bytes", info.total_size);
    }

    Ok(())
}
