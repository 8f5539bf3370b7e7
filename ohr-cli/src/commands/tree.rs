//! Tree command implementation

use super::load;
use anyhow::Result;
use ohr_core::DecodeOptions;
use std::path::Path;

/// Print the folder tree with each folder's books
pub fn tree(input: &Path, options: &DecodeOptions) -> Result<()> {
    let catalog = load(input, options)?;

    for (level, folder) in catalog.walk() {
        let indent = "  ".repeat(level);
        println!("{}{}/", indent, folder.name());

        for book in folder.books() {
            let types: Vec<&str> = book.files().types().collect();
            println!(
                "{}  - {} ({}) [{}] {} bytes",
                indent,
                book.name(),
                book.author(),
                types.join(", "),
                book.size()
            );
        }
    }

    Ok(())
}
