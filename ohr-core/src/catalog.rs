//! Reading and writing whole catalog documents
//!
//! A catalog is an XML document whose root element is a `<Folder>`. The same
//! tree can also be stored as JSON through its serde representation.

use crate::error::{MetadataError, Result};
use crate::types::BookFolder;
use crate::xml::Element;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default limit on folder nesting when decoding
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling how metadata is decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest folder nesting accepted, counting the root folder as 1
    pub max_depth: usize,

    /// Take book names from the `type` attribute instead of `name`,
    /// matching readers that predate the fix
    pub legacy_name_attribute: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            legacy_name_attribute: false,
        }
    }
}

impl DecodeOptions {
    /// Set the folder nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable legacy book name decoding
    pub fn with_legacy_name_attribute(mut self, legacy: bool) -> Self {
        self.legacy_name_attribute = legacy;
        self
    }

    /// Element nesting a valid document can reach with these options
    ///
    /// A folder at depth `d` sits at element depth `2d - 1`, and the `<Url>`
    /// of its books' files at `2d + 4`. One folder level past `max_depth`
    /// still parses so that it is reported as too deep by the decoder.
    /// JSON nests the same way with one level less at the leaves, so the
    /// bound serves both forms.
    fn max_element_nesting(&self) -> usize {
        self.max_depth
            .saturating_add(1)
            .saturating_mul(2)
            .saturating_add(4)
    }
}

/// Parse a catalog document with default options
pub fn read_catalog(xml: &str) -> Result<BookFolder> {
    read_catalog_with(xml, &DecodeOptions::default())
}

/// Parse a catalog document
pub fn read_catalog_with(xml: &str, options: &DecodeOptions) -> Result<BookFolder> {
    let root = Element::parse_with_limit(xml, options.max_element_nesting())?;
    Ok(BookFolder::from_xml_with(&root, options)?)
}

/// Render a catalog document
pub fn write_catalog(folder: &BookFolder) -> Result<String> {
    Ok(folder.to_xml().to_xml_string()?)
}

/// Parse a catalog in its JSON form with default options
pub fn read_catalog_json(json: &str) -> Result<BookFolder> {
    read_catalog_json_with(json, &DecodeOptions::default())
}

/// Parse a catalog in its JSON form
///
/// Folder nesting is bounded by `options.max_depth` rather than by serde_json's
/// own recursion limit. The legacy name option has no effect here, as JSON
/// always carries the name field.
pub fn read_catalog_json_with(json: &str, options: &DecodeOptions) -> Result<BookFolder> {
    let too_deep = MetadataError::DepthExceeded {
        limit: options.max_depth,
    };

    // Bound the nesting before the deserializer recurses into it
    if json_nesting_exceeds(json, options.max_element_nesting()) {
        return Err(too_deep.into());
    }

    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let folder = BookFolder::deserialize(&mut deserializer)?;
    deserializer.end()?;

    if folder.depth() > options.max_depth {
        return Err(too_deep.into());
    }

    Ok(folder)
}

/// Render a catalog in its JSON form
pub fn write_catalog_json(folder: &BookFolder) -> Result<String> {
    Ok(serde_json::to_string_pretty(folder)?)
}

/// Check whether objects and arrays in `json` nest deeper than `limit`
///
/// Brackets inside strings are skipped; syntax is left to the deserializer.
fn json_nesting_exceeds(json: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    false
}

/// Read and parse a catalog file
pub fn load_catalog(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<BookFolder> {
    let xml = fs::read_to_string(path)?;
    read_catalog_with(&xml, options)
}

/// Render a catalog and write it to a file
pub fn save_catalog(path: impl AsRef<Path>, folder: &BookFolder) -> Result<()> {
    fs::write(path, write_catalog(folder)?)?;
    Ok(())
}
