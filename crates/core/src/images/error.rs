//! Error types for the image store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while storing or serving images.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The requested name is not a plain `.jpg` file name.
    #[error("Invalid image name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Neither the requested image nor the default image exist.
    #[error("Image not found: {0}")]
    NotFound(String),

    /// The upload stream could not be read to the end.
    #[error("Failed to read image source")]
    SourceUnreadable(#[source] std::io::Error),

    /// Creating, writing or reading a file in the image directory failed.
    #[error("Image I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImageError {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
