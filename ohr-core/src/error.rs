//! Error types for Ohr Core

use thiserror::Error;

/// Result type alias using OhrError
pub type Result<T> = std::result::Result<T, OhrError>;

/// Top-level error type for all Ohr operations
#[derive(Debug, Error)]
pub enum OhrError {
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while decoding metadata from an element tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// A required element was absent
    #[error("Missing element: {0}")]
    NullInput(String),

    #[error("Unexpected element <{found}>, expected <{expected}>")]
    UnexpectedTag {
        expected: &'static str,
        found: String,
    },

    #[error("Malformed attribute '{attribute}' on <{element}>: {reason}")]
    MalformedAttribute {
        element: &'static str,
        attribute: &'static str,
        reason: String,
    },

    #[error("Malformed URI '{value}': {reason}")]
    MalformedUri { value: String, reason: String },

    #[error("Malformed base64 hash: {0}")]
    MalformedBase64(String),

    #[error("Duplicate file type: {0}")]
    DuplicateKey(String),

    #[error("No file of type: {0}")]
    KeyNotFound(String),

    #[error("Folder nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },
}

impl MetadataError {
    pub(crate) fn missing_attribute(element: &'static str, attribute: &'static str) -> Self {
        MetadataError::MalformedAttribute {
            element,
            attribute,
            reason: "attribute is missing".to_string(),
        }
    }
}

/// Errors that occur while reading or writing XML documents
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XmlError {
    #[error("Syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("Document has no root element")]
    NoRoot,

    #[error("Document has more than one root element")]
    MultipleRoots,

    #[error("Element nesting exceeds the limit of {limit}")]
    TooDeep { limit: usize },

    #[error("Write failed: {0}")]
    Write(String),
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        XmlError::Write(err.to_string())
    }
}

impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        XmlError::Write(err.to_string())
    }
}
