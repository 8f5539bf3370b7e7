//! A single downloadable file belonging to a book

use super::codec::{expect_tag, required_attribute, required_child};
use crate::error::MetadataError;
use crate::xml::Element;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Length in bytes of a SHA-512 digest
pub const SHA512_DIGEST_LEN: usize = 64;

/// Well-known file roles within a book
///
/// Books may also carry custom file types that are not listed here; those are
/// looked up by their raw string tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Search index for the book's text
    Index,

    /// Full text of the book
    Text,
}

impl FileType {
    /// Every well-known file type
    pub const ALL: [FileType; 2] = [FileType::Index, FileType::Text];

    /// The tag used for this type in serialized metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Index => "Index",
            FileType::Text => "Text",
        }
    }
}

impl AsRef<str> for FileType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<FileType> for String {
    fn from(file_type: FileType) -> Self {
        file_type.as_str().to_string()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown file type: {}", s))
    }
}

/// Describes a single file that is part of a book
///
/// For metadata published by a server the URL is a public download location;
/// for metadata describing a downloaded copy it points at the local file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookFile {
    #[serde(rename = "type")]
    file_type: String,
    url: Url,
    #[serde(with = "base64_serde")]
    hash: Vec<u8>,
    size: u64,
}

impl BookFile {
    /// Element name of a serialized file
    pub const TAG: &'static str = "BookFile";

    /// Create a file description
    ///
    /// `hash` is expected to be a SHA-512 digest but is not checked; see
    /// [`BookFile::has_digest_length`].
    pub fn new(file_type: impl Into<String>, url: Url, hash: Vec<u8>, size: u64) -> Self {
        Self {
            file_type: file_type.into(),
            url,
            hash,
            size,
        }
    }

    /// Kind of data contained in this file
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Location of the file contents
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// SHA-512 hash of the file contents
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Size of the file in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the hash has the length of a SHA-512 digest
    pub fn has_digest_length(&self) -> bool {
        self.hash.len() == SHA512_DIGEST_LEN
    }

    /// Serialize to a `<BookFile>` element
    pub fn to_xml(&self) -> Element {
        Element::new(Self::TAG)
            .with_attribute("type", self.file_type.as_str())
            .with_attribute("size", self.size.to_string())
            .with_child(Element::new("Url").with_text(self.url.as_str()))
            .with_child(Element::new("Hash").with_text(STANDARD.encode(&self.hash)))
    }

    /// Read a `<BookFile>` element
    pub fn from_xml(element: &Element) -> Result<Self, MetadataError> {
        expect_tag(element, Self::TAG)?;

        let file_type = required_attribute(element, Self::TAG, "type")?;

        let url_text = required_child(element, Self::TAG, "Url")?.text();
        let url = Url::parse(url_text).map_err(|e| MetadataError::MalformedUri {
            value: url_text.to_string(),
            reason: e.to_string(),
        })?;

        let hash = decode_hash(required_child(element, Self::TAG, "Hash")?.text())
            .map_err(|e| MetadataError::MalformedBase64(e.to_string()))?;

        let size = required_attribute(element, Self::TAG, "size")?
            .parse::<u64>()
            .map_err(|e| MetadataError::MalformedAttribute {
                element: Self::TAG,
                attribute: "size",
                reason: e.to_string(),
            })?;

        Ok(Self::new(file_type, url, hash, size))
    }
}

/// Decode a base64 hash, ignoring whitespace anywhere in the text
fn decode_hash(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}

/// Base64 serialization for binary data
mod base64_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::decode_hash;

    pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        decode_hash(&s).map_err(serde::de::Error::custom)
    }
}
