//! Error taxonomy of the catalog engine.

use serde::Serialize;
use thiserror::Error;

use super::types::AddItemStage;
use crate::catalog::CatalogError;
use crate::images::ImageError;

/// Coarse classification used for status codes and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BadInput,
    NotFound,
    InvalidName,
    ConstraintViolation,
    IoFailure,
    SourceUnreadable,
    Internal,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or malformed request fields. Raised before any side effect.
    #[error("Bad input: {0}")]
    BadInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Image file name failed the suffix/format contract.
    #[error("Invalid image name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Referential integrity failure. Category resolution should have
    /// prevented it, so it indicates a bug.
    #[error("Constraint violation at {stage}: {message}")]
    ConstraintViolation {
        stage: AddItemStage,
        message: String,
    },

    #[error("Image I/O failed")]
    IoFailure {
        stage: Option<AddItemStage>,
        #[source]
        source: ImageError,
    },

    #[error("Image source unreadable")]
    SourceUnreadable(#[source] ImageError),

    /// Database failure inside the add-item transaction.
    #[error("Storage failure at {stage}: {message}")]
    Storage {
        stage: AddItemStage,
        message: String,
    },

    /// Database failure on a read path.
    #[error("Database error: {0}")]
    Database(String),

    /// The request was abandoned before commit; the transaction rolled back.
    #[error("Request cancelled before commit")]
    Cancelled,

    /// A blocking database task panicked or was aborted.
    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::BadInput(_) => ErrorKind::BadInput,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::InvalidName { .. } => ErrorKind::InvalidName,
            EngineError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            EngineError::IoFailure { .. } => ErrorKind::IoFailure,
            EngineError::SourceUnreadable(_) => ErrorKind::SourceUnreadable,
            EngineError::Storage { .. }
            | EngineError::Database(_)
            | EngineError::Cancelled
            | EngineError::Worker(_) => ErrorKind::Internal,
        }
    }

    /// The add-item stage that failed, if the error came from add-item.
    pub fn stage(&self) -> Option<AddItemStage> {
        match self {
            EngineError::BadInput(_) => Some(AddItemStage::Validate),
            EngineError::ConstraintViolation { stage, .. } | EngineError::Storage { stage, .. } => {
                Some(*stage)
            }
            EngineError::IoFailure { stage, .. } => *stage,
            EngineError::SourceUnreadable(_) => Some(AddItemStage::PersistImage),
            EngineError::Cancelled => Some(AddItemStage::Commit),
            _ => None,
        }
    }

    /// Errors caused by the request itself; safe to echo to the client.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::BadInput | ErrorKind::NotFound | ErrorKind::InvalidName
        )
    }

    /// Wraps a catalog failure raised inside the add-item transaction.
    pub(crate) fn at_stage(stage: AddItemStage, e: CatalogError) -> Self {
        match e {
            CatalogError::ConstraintViolation(message) => {
                EngineError::ConstraintViolation { stage, message }
            }
            CatalogError::NotFound(message) | CatalogError::Database(message) => {
                EngineError::Storage { stage, message }
            }
        }
    }

    pub(crate) fn from_image(stage: Option<AddItemStage>, e: ImageError) -> Self {
        match e {
            ImageError::InvalidName { name, reason } => EngineError::InvalidName { name, reason },
            ImageError::NotFound(name) => EngineError::NotFound(format!("image {}", name)),
            ImageError::SourceUnreadable(_) => EngineError::SourceUnreadable(e),
            ImageError::Io { .. } => EngineError::IoFailure { stage, source: e },
        }
    }
}

/// Read paths: absence stays `NotFound`, everything else is internal.
impl From<CatalogError> for EngineError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(what) => EngineError::NotFound(what),
            CatalogError::ConstraintViolation(message) | CatalogError::Database(message) => {
                EngineError::Database(message)
            }
        }
    }
}
