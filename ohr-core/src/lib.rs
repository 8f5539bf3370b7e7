//! Ohr Core Library
//!
//! This crate provides the metadata model for a digital book library and its
//! XML catalog format. Folders hold books and nested folders, books hold typed
//! files, and every level converts to and from an [`xml::Element`] tree.

pub mod catalog;
pub mod error;
pub mod types;
pub mod xml;

pub use catalog::{
    read_catalog, read_catalog_json, read_catalog_json_with, read_catalog_with, write_catalog,
    write_catalog_json, DecodeOptions,
};
pub use error::{MetadataError, OhrError, Result, XmlError};
pub use types::{BookFile, BookFiles, BookFolder, BookInfo, FileType, FolderWalk, SHA512_DIGEST_LEN};
pub use url::Url;
pub use xml::Element;
