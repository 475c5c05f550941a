//! Trait definitions for the image store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::ImageError;
use super::types::StoredImage;

/// Storage for uploaded images, keyed by the digest of their content.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Reads `source` to the end, stores its bytes and returns the
    /// digest-derived file name.
    ///
    /// Storing the same bytes twice returns the same name.
    async fn put(&self, source: &mut (dyn AsyncRead + Send + Unpin))
        -> Result<String, ImageError>;

    /// Loads an image by file name, falling back to the default image when
    /// the file does not exist.
    async fn get(&self, name: &str) -> Result<StoredImage, ImageError>;

    /// Where a stored file name lives on disk.
    fn path_of(&self, name: &str) -> PathBuf;
}
