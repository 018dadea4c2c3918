//! Content-addressed photo storage
//!
//! Stores item photos using their SHA-256 hash as key, organized in a
//! two-level directory structure for performance.
//!
//! Example: hash "abcd1234..." is stored at "photos/ab/cd/abcd1234..."

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Content-addressed photo store
#[derive(Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    /// Create a photo store rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Initialize the store (create directory if needed)
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Photo store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Write photo bytes, returning the SHA-256 hash key.
    ///
    /// Identical photos share one file; writing an existing photo is a no-op.
    pub async fn write(&self, data: &[u8]) -> Result<String> {
        let hash = self.calculate_hash(data);

        if self.exists(&hash).await? {
            tracing::debug!("Photo already stored: {}", hash);
            return Ok(hash);
        }

        let path = self.get_path(&hash);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temp file first, then rename (atomic on the same fs)
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;

        fs::rename(temp_path, &path).await?;

        tracing::debug!("Stored photo: {} ({} bytes)", hash, data.len());

        Ok(hash)
    }

    /// Read photo bytes by hash
    pub async fn read(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.get_path(hash);

        if !path.exists() {
            return Err(AppError::PhotoStore(format!("Photo not found: {}", hash)));
        }

        let mut file = fs::File::open(&path).await?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).await?;

        Ok(data)
    }

    /// Check whether a photo exists
    pub async fn exists(&self, hash: &str) -> Result<bool> {
        Ok(self.get_path(hash).exists())
    }

    /// Delete a photo; deleting a missing photo is not an error
    pub async fn delete(&self, hash: &str) -> Result<()> {
        let path = self.get_path(hash);

        if !path.exists() {
            return Ok(());
        }

        fs::remove_file(&path).await?;

        tracing::debug!("Deleted photo: {}", hash);

        Ok(())
    }

    fn get_path(&self, hash: &str) -> PathBuf {
        // Two-level directory structure: photos/ab/cd/abcd1234...
        // Short non-hash keys fall back to the root directory.
        if hash.len() < 4 {
            return self.root.join(hash);
        }
        let prefix1 = &hash[0..2];
        let prefix2 = &hash[2..4];
        self.root.join(prefix1).join(prefix2).join(hash)
    }

    fn calculate_hash(&self, data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (PhotoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = PhotoStore::new(temp_dir.path().join("photos"));
        store.initialize().await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let (store, _temp) = create_test_store().await;

        let data = b"jpeg bytes";
        let hash = store.write(data).await.unwrap();
        assert_eq!(hash.len(), 64);

        let read_back = store.read(&hash).await.unwrap();
        assert_eq!(read_back, data);
    }

    #[tokio::test]
    async fn test_identical_photos_share_a_key() {
        let (store, _temp) = create_test_store().await;

        let hash1 = store.write(b"same photo").await.unwrap();
        let hash2 = store.write(b"same photo").await.unwrap();

        assert_eq!(hash1, hash2);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, _temp) = create_test_store().await;

        let hash = store.write(b"photo").await.unwrap();
        store.delete(&hash).await.unwrap();

        assert!(!store.exists(&hash).await.unwrap());

        // Second delete is fine
        store.delete(&hash).await.unwrap();
    }

    #[tokio::test]
    async fn test_two_level_directory_layout() {
        let (store, _temp) = create_test_store().await;

        let hash = store.write(b"layout").await.unwrap();
        let path = store.get_path(&hash);
        assert!(path.exists());

        let parent = path.parent().unwrap();
        let grandparent = parent.parent().unwrap();

        assert_eq!(parent.file_name().unwrap(), &hash[2..4]);
        assert_eq!(grandparent.file_name().unwrap(), &hash[0..2]);
    }
}
