//! File system image store implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::ImageError;
use super::traits::ImageStore;
use super::types::{validate_image_name, StoredImage, IMAGE_EXTENSION};
use crate::metrics::IMAGE_FALLBACKS_TOTAL;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Image store backed by a flat directory of `<sha256>.jpg` files.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
    default_image: String,
}

impl FsImageStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>, default_image: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_image: default_image.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Drains `source` into memory while hashing it.
    async fn read_and_hash(
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(String, Vec<u8>), ImageError> {
        let mut hasher = Sha256::new();
        let mut bytes = Vec::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let bytes_read = source
                .read(&mut buffer)
                .await
                .map_err(ImageError::SourceUnreadable)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
            bytes.extend_from_slice(&buffer[..bytes_read]);
        }

        let name = format!("{:x}.{}", hasher.finalize(), IMAGE_EXTENSION);
        Ok((name, bytes))
    }

    /// Writes to a temporary sibling and renames it into place, so readers
    /// never observe a partially written image.
    async fn write_atomically(&self, name: &str, bytes: &[u8]) -> Result<(), ImageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ImageError::io(&self.dir, e))?;

        let destination = self.dir.join(name);
        let temp_path = self.dir.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));

        if let Err(e) = fs::write(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ImageError::io(&temp_path, e));
        }

        if let Err(e) = fs::rename(&temp_path, &destination).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ImageError::io(&destination, e));
        }

        Ok(())
    }

    async fn load_default(&self) -> Result<StoredImage, ImageError> {
        let path = self.dir.join(&self.default_image);
        match fs::read(&path).await {
            Ok(bytes) => Ok(StoredImage {
                name: self.default_image.clone(),
                bytes,
                fallback: true,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Default image missing: {}", path.display());
                Err(ImageError::NotFound(self.default_image.clone()))
            }
            Err(e) => Err(ImageError::io(path, e)),
        }
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn put(
        &self,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<String, ImageError> {
        let (name, bytes) = Self::read_and_hash(source).await?;
        self.write_atomically(&name, &bytes).await?;
        debug!("Stored image {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    async fn get(&self, name: &str) -> Result<StoredImage, ImageError> {
        validate_image_name(name)?;

        let path = self.dir.join(name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(StoredImage {
                name: name.to_string(),
                bytes,
                fallback: false,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Image not found: {}", path.display());
                IMAGE_FALLBACKS_TOTAL.inc();
                self.load_default().await
            }
            Err(e) => Err(ImageError::io(path, e)),
        }
    }

    fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}
