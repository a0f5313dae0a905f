//! Content digest of stored files.
//!
//! SHA-256, hex encoded. The digest doubles as the dedup key and is exposed to
//! clients as the record's `hash`.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Produces the dedup digest of a stored file
#[async_trait]
pub trait ContentDigest: Send + Sync {
    async fn digest(&self, path: &Path) -> std::io::Result<String>;
}

/// SHA-256 over the file contents
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

#[async_trait]
impl ContentDigest for Sha256Digest {
    async fn digest(&self, path: &Path) -> std::io::Result<String> {
        digest_file(path).await
    }
}

/// Hash the full contents of the file at `path`
pub async fn digest_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path.as_ref()).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
