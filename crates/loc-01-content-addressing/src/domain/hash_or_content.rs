//! # Hash or Content
//!
//! A payload known either by its hash (and possibly size) or by its content.
//! Hash and size are computed on the first `finalize` and never change after.

use super::content::{ContentDigest, FileContent};
use super::errors::ContentError;
use shared_types::Hash;

/// Lazily finalized hash/size pair.
#[derive(Clone, Debug)]
pub struct HashOrContent {
    content: Option<FileContent>,
    declared_hash: Option<Hash>,
    declared_size: Option<u64>,
    finalized: Option<ContentDigest>,
}

impl HashOrContent {
    /// Known hash; the size may come later through [`Self::finalize_declared`].
    pub fn from_hash(hash: Hash, size: Option<u64>) -> Self {
        Self {
            content: None,
            declared_hash: Some(hash),
            declared_size: size,
            finalized: size.map(|size| ContentDigest { hash, size }),
        }
    }

    /// Content to be digested on finalize.
    pub fn from_content(content: FileContent) -> Self {
        Self {
            content: Some(content),
            declared_hash: None,
            declared_size: None,
            finalized: None,
        }
    }

    /// Content with a size the digest must confirm.
    pub fn from_content_with_size(content: FileContent, size: u64) -> Self {
        Self {
            declared_size: Some(size),
            ..Self::from_content(content)
        }
    }

    /// Attach content to a payload known by hash; finalize checks they agree.
    pub fn with_content(mut self, content: FileContent) -> Self {
        self.content = Some(content);
        self.finalized = None;
        self
    }

    /// Compute hash and size once. Later calls return the cached pair.
    pub async fn finalize(&mut self) -> Result<ContentDigest, ContentError> {
        if let Some(digest) = self.finalized {
            return Ok(digest);
        }
        let digest = match &self.content {
            Some(content) => {
                let digest = content.digest().await?;
                if let Some(declared) = self.declared_hash {
                    if declared != digest.hash {
                        return Err(ContentError::HashMismatch {
                            declared,
                            actual: digest.hash,
                        });
                    }
                }
                if let Some(declared) = self.declared_size {
                    if declared != digest.size {
                        return Err(ContentError::SizeMismatch {
                            declared,
                            actual: digest.size,
                        });
                    }
                }
                digest
            }
            None => {
                let hash = self.declared_hash.ok_or(ContentError::NotFinalized)?;
                let size = self.declared_size.ok_or(ContentError::MissingSize(hash))?;
                ContentDigest { hash, size }
            }
        };
        self.finalized = Some(digest);
        Ok(digest)
    }

    /// Finalize with a declared size; a conflicting size fails.
    pub async fn finalize_declared(&mut self, size: u64) -> Result<ContentDigest, ContentError> {
        let known = self.finalized.map(|d| d.size).or(self.declared_size);
        if let Some(actual) = known {
            if actual != size {
                return Err(ContentError::SizeMismatch {
                    declared: size,
                    actual,
                });
            }
        }
        self.declared_size = Some(size);
        self.finalize().await
    }

    /// Finalized hash, or the declared one.
    pub fn hash(&self) -> Result<Hash, ContentError> {
        self.finalized
            .map(|d| d.hash)
            .or(self.declared_hash)
            .ok_or(ContentError::NotFinalized)
    }

    /// Finalized size.
    pub fn size(&self) -> Result<u64, ContentError> {
        self.finalized
            .map(|d| d.size)
            .ok_or(ContentError::NotFinalized)
    }

    /// Finalized pair.
    pub fn digest(&self) -> Result<ContentDigest, ContentError> {
        self.finalized.ok_or(ContentError::NotFinalized)
    }

    /// True once hash and size are fixed.
    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Raw content, if any.
    pub fn content(&self) -> Option<&FileContent> {
        self.content.as_ref()
    }

    /// True when content is attached.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_finalize_is_idempotent() {
        let mut payload = HashOrContent::from_content(FileContent::bytes("12345"));
        let first = payload.finalize_declared(5).await.unwrap();
        let second = payload.finalize_declared(5).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.size, 5);
        assert_eq!(first.hash, Hash::of_str("12345"));
    }

    #[tokio::test]
    async fn test_conflicting_size_fails() {
        let mut payload = HashOrContent::from_content(FileContent::bytes("12345"));
        payload.finalize().await.unwrap();
        let result = payload.finalize_declared(6).await;
        assert_eq!(
            result,
            Err(ContentError::SizeMismatch {
                declared: 6,
                actual: 5
            })
        );
        // Cached pair is untouched.
        assert_eq!(payload.size().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_declared_size_checked_against_content() {
        let mut payload = HashOrContent::from_content_with_size(FileContent::bytes("abc"), 4);
        assert!(matches!(
            payload.finalize().await,
            Err(ContentError::SizeMismatch { declared: 4, actual: 3 })
        ));
        assert!(!payload.is_finalized());
    }

    #[tokio::test]
    async fn test_hash_mismatch() {
        let mut payload = HashOrContent::from_hash(Hash::of_str("other"), Some(3))
            .with_content(FileContent::bytes("abc"));
        assert!(matches!(
            payload.finalize().await,
            Err(ContentError::HashMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_hash_only_needs_size() {
        let hash = Hash::of_str("remote");
        let mut payload = HashOrContent::from_hash(hash, None);
        assert_eq!(payload.hash().unwrap(), hash);
        assert_eq!(payload.finalize().await, Err(ContentError::MissingSize(hash)));

        let digest = payload.finalize_declared(5).await.unwrap();
        assert_eq!(digest, ContentDigest { hash, size: 5 });
        assert!(!payload.has_content());
    }

    #[test]
    fn test_from_hash_with_size_is_final() {
        let hash = Hash::of_str("x");
        let payload = HashOrContent::from_hash(hash, Some(1));
        assert!(payload.is_finalized());
        assert_eq!(payload.size().unwrap(), 1);
    }

    proptest! {
        #[test]
        fn prop_finalize_twice_same_digest(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let len = data.len() as u64;
            let mut payload = HashOrContent::from_content(FileContent::bytes(data.clone()));
            let first = runtime.block_on(payload.finalize_declared(len)).unwrap();
            let second = runtime.block_on(payload.finalize()).unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(first.hash, Hash::of(&data));
            prop_assert!(runtime.block_on(payload.finalize_declared(len + 1)).is_err());
        }
    }
}
