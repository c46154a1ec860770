//! # Content Digest
//!
//! Files are read in fixed-size chunks so large payloads never sit in memory
//! as a whole.

use crate::domain::{ContentDigest, ContentError};
use sha2::{Digest, Sha256};
use shared_types::Hash;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Read buffer size.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Digest an in-memory buffer.
pub fn digest_bytes(bytes: &[u8]) -> ContentDigest {
    ContentDigest {
        hash: Hash::of(bytes),
        size: bytes.len() as u64,
    }
}

/// Digest a file chunk by chunk.
pub async fn digest_file(path: &Path) -> Result<ContentDigest, ContentError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| ContentError::Io(format!("{}: {}", path.display(), e)))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut size = 0u64;

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
        size += read as u64;
    }

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    tracing::debug!("[loc-01] Digested {} ({} bytes)", path.display(), size);
    Ok(ContentDigest {
        hash: Hash::from_bytes(bytes),
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_digest_bytes() {
        let digest = digest_bytes(b"abc");
        assert_eq!(digest.size, 3);
        assert_eq!(digest.hash, Hash::of_str("abc"));
    }

    #[tokio::test]
    async fn test_file_digest_matches_bytes() {
        // Spans several chunks.
        let data: Vec<u8> = (0..(CHUNK_SIZE * 2 + 17)).map(|i| (i % 251) as u8).collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&data).unwrap();

        let from_file = digest_file(file.path()).await.unwrap();
        assert_eq!(from_file, digest_bytes(&data));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = digest_file(Path::new("/nonexistent/loc/file.bin")).await;
        assert!(matches!(result, Err(ContentError::Io(_))));
    }
}
