//! Book metadata and its files, keyed by file type

use super::codec::{expect_tag, required_attribute, required_child};
use super::BookFile;
use crate::catalog::DecodeOptions;
use crate::error::MetadataError;
use crate::xml::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The files of a book, organized by type
///
/// Built once from a sequence of files and read-only afterwards. Iteration
/// follows construction order; lookup goes through the file type tag, either
/// as a raw string or as a [`FileType`](super::FileType).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BookFile>", into = "Vec<BookFile>")]
pub struct BookFiles {
    files: Vec<BookFile>,
    index: HashMap<String, usize>,
}

impl BookFiles {
    /// Build the collection, rejecting two files with the same type
    pub fn new(files: impl IntoIterator<Item = BookFile>) -> Result<Self, MetadataError> {
        let mut collection = Self::default();
        for file in files {
            if collection.index.contains_key(file.file_type()) {
                return Err(MetadataError::DuplicateKey(file.file_type().to_string()));
            }
            collection
                .index
                .insert(file.file_type().to_string(), collection.files.len());
            collection.files.push(file);
        }
        Ok(collection)
    }

    /// Get the file of the given type, if present
    pub fn get(&self, file_type: impl AsRef<str>) -> Option<&BookFile> {
        self.index
            .get(file_type.as_ref())
            .map(|&position| &self.files[position])
    }

    /// Get the file of the given type, failing if the book has none
    pub fn require(&self, file_type: impl AsRef<str>) -> Result<&BookFile, MetadataError> {
        let key = file_type.as_ref();
        self.get(key)
            .ok_or_else(|| MetadataError::KeyNotFound(key.to_string()))
    }

    /// Check whether a file of the given type exists
    pub fn contains(&self, file_type: impl AsRef<str>) -> bool {
        self.index.contains_key(file_type.as_ref())
    }

    /// File type tags in construction order
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(BookFile::file_type)
    }

    /// Iterate over the files in construction order
    pub fn iter(&self) -> std::slice::Iter<'_, BookFile> {
        self.files.iter()
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if there are no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a> IntoIterator for &'a BookFiles {
    type Item = &'a BookFile;
    type IntoIter = std::slice::Iter<'a, BookFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<BookFile>> for BookFiles {
    type Error = MetadataError;

    fn try_from(files: Vec<BookFile>) -> Result<Self, Self::Error> {
        Self::new(files)
    }
}

impl From<BookFiles> for Vec<BookFile> {
    fn from(files: BookFiles) -> Self {
        files.files
    }
}

/// Basic metadata about a book that may or may not have been downloaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    name: String,
    author: String,
    icon_name: String,
    files: BookFiles,
}

impl BookInfo {
    /// Element name of a serialized book
    pub const TAG: &'static str = "Book";

    /// Create book metadata; fails if two files share a type
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        icon_name: impl Into<String>,
        files: impl IntoIterator<Item = BookFile>,
    ) -> Result<Self, MetadataError> {
        Ok(Self {
            name: name.into(),
            author: author.into(),
            icon_name: icon_name.into(),
            files: BookFiles::new(files)?,
        })
    }

    /// Title of the book
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the person who wrote the book
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Name of the icon to display for this book
    pub fn icon_name(&self) -> &str {
        &self.icon_name
    }

    /// Files containing the book's text and full metadata
    pub fn files(&self) -> &BookFiles {
        &self.files
    }

    /// Combined size of all files in bytes, saturating at `u64::MAX`
    pub fn size(&self) -> u64 {
        self.files
            .iter()
            .fold(0u64, |total, file| total.saturating_add(file.size()))
    }

    /// Serialize to a `<Book>` element
    pub fn to_xml(&self) -> Element {
        Element::new(Self::TAG)
            .with_attribute("name", self.name.as_str())
            .with_attribute("author", self.author.as_str())
            .with_child(Element::new("Icon").with_text(self.icon_name.as_str()))
            .with_child(
                Element::new("Files").with_children(self.files.iter().map(BookFile::to_xml)),
            )
    }

    /// Read a `<Book>` element with default options
    pub fn from_xml(element: &Element) -> Result<Self, MetadataError> {
        Self::from_xml_with(element, &DecodeOptions::default())
    }

    /// Read a `<Book>` element
    pub fn from_xml_with(
        element: &Element,
        options: &DecodeOptions,
    ) -> Result<Self, MetadataError> {
        expect_tag(element, Self::TAG)?;

        // Older readers took the name from `type`, which writers never emit
        let name = if options.legacy_name_attribute {
            element.attribute("type").unwrap_or_default()
        } else {
            required_attribute(element, Self::TAG, "name")?
        };
        let author = required_attribute(element, Self::TAG, "author")?;
        let icon_name = required_child(element, Self::TAG, "Icon")?.text();

        let files = required_child(element, Self::TAG, "Files")?
            .children()
            .iter()
            .map(BookFile::from_xml)
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(name, author, icon_name, files)
    }
}
