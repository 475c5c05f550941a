//! Naming rules and value types for stored images.

use serde::Serialize;

use super::error::ImageError;

/// Extension of every stored image.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Reserved placeholder served when an image is missing.
pub const DEFAULT_IMAGE_NAME: &str = "default.jpg";

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// An image loaded from the store.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    /// File name that was actually served.
    pub name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// True when the requested file was absent and the default was served.
    pub fallback: bool,
}

/// Checks that `name` is a plain `<stem>.jpg` file name.
///
/// Anything with a path separator, a parent reference or a NUL byte is
/// rejected, so a valid name can always be joined onto the image directory.
pub fn validate_image_name(name: &str) -> Result<(), ImageError> {
    let suffix = format!(".{}", IMAGE_EXTENSION);
    let Some(stem) = name.strip_suffix(suffix.as_str()) else {
        return Err(ImageError::invalid_name(name, "must end with .jpg"));
    };
    if stem.is_empty() {
        return Err(ImageError::invalid_name(name, "empty file stem"));
    }
    if name.contains(['/', '\\', '\0']) || name.contains("..") {
        return Err(ImageError::invalid_name(name, "must be a plain file name"));
    }
    Ok(())
}

/// True if `name` has the shape produced by hashing: 64 lowercase hex
/// digits followed by `.jpg`.
pub fn is_digest_name(name: &str) -> bool {
    let suffix = format!(".{}", IMAGE_EXTENSION);
    match name.strip_suffix(suffix.as_str()) {
        Some(stem) => {
            stem.len() == DIGEST_HEX_LEN
                && stem
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}
