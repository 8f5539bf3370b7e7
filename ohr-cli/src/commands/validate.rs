//! Validate command implementation

use super::load;
use anyhow::{bail, Result};
use ohr_core::{BookFolder, DecodeOptions, SHA512_DIGEST_LEN};
use std::path::Path;

/// Validate a catalog file
pub fn validate(input: &Path, strict: bool, options: &DecodeOptions) -> Result<()> {
    let catalog = match load(input, options) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Invalid catalog: {:#}", e);
            bail!("Validation failed for {}", input.display());
        }
    };

    if strict {
        let problems = strict_problems(&catalog);
        if !problems.is_empty() {
            for problem in &problems {
                eprintln!("  {}", problem);
            }
            bail!(
                "Validation failed for {}: {} problems",
                input.display(),
                problems.len()
            );
        }
    }

    println!("Valid catalog");
    println!("  Name: {}", catalog.name());
    println!("  Books: {}", catalog.book_count());

    Ok(())
}

/// Checks beyond what decoding enforces
pub(crate) fn strict_problems(catalog: &BookFolder) -> Vec<String> {
    let mut problems = Vec::new();

    for (_, folder) in catalog.walk() {
        for book in folder.books() {
            if book.files().is_empty() {
                problems.push(format!(
                    "Book '{}' in folder '{}' has no files",
                    book.name(),
                    folder.name()
                ));
            }

            for file in book.files() {
                if !file.has_digest_length() {
                    problems.push(format!(
                        "File '{}' of book '{}' has a {}-byte hash, expected {}",
                        file.file_type(),
                        book.name(),
                        file.hash().len(),
                        SHA512_DIGEST_LEN
                    ));
                }
            }
        }
    }

    problems
}
