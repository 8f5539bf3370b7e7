//! Folders forming the library's display tree

use super::codec::{expect_tag, required_attribute, required_child};
use super::BookInfo;
use crate::catalog::DecodeOptions;
use crate::error::MetadataError;
use crate::xml::Element;
use serde::{Deserialize, Serialize};

/// A named folder holding books and nested folders
///
/// Each folder exclusively owns its books and subfolders. The tree is built
/// once and never modified; any change means building a new tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFolder {
    name: String,
    books: Vec<BookInfo>,
    subfolders: Vec<BookFolder>,
}

impl BookFolder {
    /// Element name of a serialized folder
    pub const TAG: &'static str = "Folder";

    /// Create a folder from its books and subfolders, keeping their order
    pub fn new(
        name: impl Into<String>,
        books: impl IntoIterator<Item = BookInfo>,
        subfolders: impl IntoIterator<Item = BookFolder>,
    ) -> Self {
        Self {
            name: name.into(),
            books: books.into_iter().collect(),
            subfolders: subfolders.into_iter().collect(),
        }
    }

    /// Display name of the folder
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books directly within this folder
    pub fn books(&self) -> &[BookInfo] {
        &self.books
    }

    /// Folders directly within this folder
    pub fn subfolders(&self) -> &[BookFolder] {
        &self.subfolders
    }

    /// Depth-first, pre-order walk over this folder and all folders below it
    pub fn walk(&self) -> FolderWalk<'_> {
        FolderWalk {
            stack: vec![(0, self)],
        }
    }

    /// Number of books in this folder and all folders below it
    pub fn book_count(&self) -> usize {
        self.walk().map(|(_, folder)| folder.books.len()).sum()
    }

    /// Combined size of every book in the tree, saturating at `u64::MAX`
    pub fn total_size(&self) -> u64 {
        self.walk()
            .flat_map(|(_, folder)| folder.books.iter())
            .fold(0u64, |total, book| total.saturating_add(book.size()))
    }

    /// Number of folder levels, counting this one
    pub fn depth(&self) -> usize {
        self.walk().map(|(level, _)| level + 1).max().unwrap_or(1)
    }

    /// First book with the given name, in walk order
    pub fn find_book(&self, name: &str) -> Option<&BookInfo> {
        self.walk()
            .flat_map(|(_, folder)| folder.books.iter())
            .find(|book| book.name() == name)
    }

    /// Serialize to a `<Folder>` element, including all subfolders
    pub fn to_xml(&self) -> Element {
        Element::new(Self::TAG)
            .with_attribute("name", self.name.as_str())
            .with_child(
                Element::new("Books").with_children(self.books.iter().map(BookInfo::to_xml)),
            )
            .with_child(
                Element::new("Subfolders")
                    .with_children(self.subfolders.iter().map(BookFolder::to_xml)),
            )
    }

    /// Read a `<Folder>` element with default options
    pub fn from_xml(element: &Element) -> Result<Self, MetadataError> {
        Self::from_xml_with(element, &DecodeOptions::default())
    }

    /// Read a `<Folder>` element, refusing nesting beyond `options.max_depth`
    pub fn from_xml_with(
        element: &Element,
        options: &DecodeOptions,
    ) -> Result<Self, MetadataError> {
        Self::decode(element, options, 1)
    }

    fn decode(
        element: &Element,
        options: &DecodeOptions,
        depth: usize,
    ) -> Result<Self, MetadataError> {
        if depth > options.max_depth {
            return Err(MetadataError::DepthExceeded {
                limit: options.max_depth,
            });
        }
        expect_tag(element, Self::TAG)?;

        let name = required_attribute(element, Self::TAG, "name")?;

        let books = required_child(element, Self::TAG, "Books")?
            .children()
            .iter()
            .map(|book| BookInfo::from_xml_with(book, options))
            .collect::<Result<Vec<_>, _>>()?;

        let subfolders = required_child(element, Self::TAG, "Subfolders")?
            .children()
            .iter()
            .map(|folder| Self::decode(folder, options, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(name, books, subfolders))
    }
}

/// Iterator returned by [`BookFolder::walk`]
///
/// Yields each folder with its level below the starting folder (0 for the
/// start). Uses an explicit stack, so deep trees do not grow the call stack.
pub struct FolderWalk<'a> {
    stack: Vec<(usize, &'a BookFolder)>,
}

impl<'a> Iterator for FolderWalk<'a> {
    type Item = (usize, &'a BookFolder);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, folder) = self.stack.pop()?;
        self.stack
            .extend(folder.subfolders.iter().rev().map(|child| (level + 1, child)));
        Some((level, folder))
    }
}
