//! # File Content
//!
//! Raw payloads and the values derived from them.

use super::errors::ContentError;
use super::hash_or_content::HashOrContent;
use crate::algorithms::{digest_bytes, digest_file};
use serde::{Deserialize, Serialize};
use shared_types::Hash;
use std::fmt;
use std::path::PathBuf;

/// Raw payload of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileContent {
    /// In-memory content.
    Bytes(Vec<u8>),
    /// Content on disk, read lazily.
    Path(PathBuf),
}

impl FileContent {
    /// In-memory content.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        FileContent::Bytes(bytes.into())
    }

    /// Content on disk.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FileContent::Path(path.into())
    }

    /// Hash and size of the content.
    pub async fn digest(&self) -> Result<ContentDigest, ContentError> {
        match self {
            FileContent::Bytes(bytes) => Ok(digest_bytes(bytes)),
            FileContent::Path(path) => digest_file(path).await,
        }
    }

    /// Whole content, for upload.
    pub async fn to_bytes(&self) -> Result<Vec<u8>, ContentError> {
        match self {
            FileContent::Bytes(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| ContentError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}

/// Hash and size of a payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// SHA-256 of the content.
    pub hash: Hash,
    /// Size in bytes.
    pub size: u64,
}

/// A `type/subtype` MIME type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MimeType(String);

impl MimeType {
    /// Parse and validate.
    pub fn parse(value: &str) -> Result<Self, ContentError> {
        let mut parts = value.splitn(2, '/');
        let main = parts.next().unwrap_or_default();
        let sub = parts.next().unwrap_or_default();
        let valid_part = |p: &str| {
            !p.is_empty()
                && p.chars()
                    .all(|c| c.is_ascii_alphanumeric() || "!#$&^_.+-;= ".contains(c))
        };
        if valid_part(main) && valid_part(sub) {
            Ok(Self(value.to_string()))
        } else {
            Err(ContentError::InvalidContentType(value.to_string()))
        }
    }

    /// Text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MimeType {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MimeType::parse(&value)
    }
}

impl From<MimeType> for String {
    fn from(value: MimeType) -> Self {
        value.0
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A collection item or tokens record file, with or without its content.
#[derive(Clone, Debug)]
pub struct ItemFileWithContent {
    /// File name.
    pub name: String,
    /// MIME type.
    pub content_type: MimeType,
    /// Hash, size and optional content.
    pub hash_or_content: HashOrContent,
}

impl ItemFileWithContent {
    /// Build from parts; the content type is validated.
    pub fn new(
        name: impl Into<String>,
        content_type: &str,
        hash_or_content: HashOrContent,
    ) -> Result<Self, ContentError> {
        Ok(Self {
            name: name.into(),
            content_type: MimeType::parse(content_type)?,
            hash_or_content,
        })
    }

    /// Finalized hash.
    pub fn hash(&self) -> Result<Hash, ContentError> {
        self.hash_or_content.hash()
    }

    /// Finalized size.
    pub fn size(&self) -> Result<u64, ContentError> {
        self.hash_or_content.size()
    }

    /// Finalize the underlying payload.
    pub async fn finalize(&mut self) -> Result<ContentDigest, ContentError> {
        self.hash_or_content.finalize().await
    }
}
