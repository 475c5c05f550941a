//! Types for the item catalog.

use chrono::{DateTime, Utc};
use rusqlite::ErrorCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned to a category on first insertion.
pub type CategoryId = i64;

/// Identifier assigned to an item on insertion.
pub type ItemId = i64;

/// A category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Outcome of resolving a category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCategory {
    pub id: CategoryId,
    /// True if this call inserted the row.
    pub created: bool,
}

/// An item joined with its category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Category name.
    pub category: String,
    pub category_id: CategoryId,
    /// Digest-derived file name in the image store.
    pub image_name: String,
    pub created_at: DateTime<Utc>,
}

/// Row to insert into `items`.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub category_id: CategoryId,
    pub image_name: String,
}

/// A search hit: item name and category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub name: String,
    pub category: String,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        if is_constraint_violation(&e) {
            CatalogError::ConstraintViolation(e.to_string())
        } else {
            CatalogError::Database(e.to_string())
        }
    }
}

/// True for UNIQUE, FOREIGN KEY and NOT NULL failures.
pub(crate) fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}
