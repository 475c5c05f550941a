//! Content-addressed image storage.
//!
//! Images are stored under the lowercase hex SHA-256 digest of their bytes
//! plus a `.jpg` suffix, so identical uploads always map to the same file
//! and re-uploading is an overwrite with identical content.
//!
//! Reads never fail because an image is missing: a reserved placeholder
//! (`default.jpg`) is served in its place. Names that are not plain
//! `.jpg` file names are rejected before touching the filesystem.
//!
//! # Example
//!
//! ```ignore
//! use bazaar_core::images::{FsImageStore, ImageStore};
//!
//! let store = FsImageStore::new("images", "default.jpg");
//! let mut bytes: &[u8] = b"jpeg bytes";
//! let name = store.put(&mut bytes).await?;
//! let image = store.get(&name).await?;
//! assert!(!image.fallback);
//! ```

mod error;
mod fs_store;
mod traits;
mod types;

pub use error::ImageError;
pub use fs_store::FsImageStore;
pub use traits::ImageStore;
pub use types::{
    is_digest_name, validate_image_name, StoredImage, DEFAULT_IMAGE_NAME, IMAGE_EXTENSION,
};
