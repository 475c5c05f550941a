//! Category directory: name → id, created on first use.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use super::types::is_constraint_violation;
use super::{Category, CatalogError, ResolvedCategory};
use crate::metrics::CATEGORY_CONFLICTS_TOTAL;

/// Looks up a category by its exact name.
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Category>, CatalogError> {
    let category = conn
        .query_row(
            "SELECT id, name FROM categories WHERE name = ?1",
            params![name],
            row_to_category,
        )
        .optional()?;
    Ok(category)
}

/// Returns the id of `name`, inserting the category if it does not exist.
///
/// Meant to run on the same transaction as the item insert that needs it.
/// If a concurrent writer creates the same name first, the UNIQUE constraint
/// rejects our insert and the existing row is returned instead.
pub fn resolve_or_create(conn: &Connection, name: &str) -> Result<ResolvedCategory, CatalogError> {
    if let Some(category) = find_by_name(conn, name)? {
        return Ok(ResolvedCategory {
            id: category.id,
            created: false,
        });
    }
    create(conn, name)
}

/// All categories in id order.
pub fn list(conn: &Connection) -> Result<Vec<Category>, CatalogError> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], row_to_category)?;

    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

fn create(conn: &Connection, name: &str) -> Result<ResolvedCategory, CatalogError> {
    match conn.execute("INSERT INTO categories (name) VALUES (?1)", params![name]) {
        Ok(_) => Ok(ResolvedCategory {
            id: conn.last_insert_rowid(),
            created: true,
        }),
        Err(e) if is_constraint_violation(&e) => {
            warn!("Category {:?} created concurrently, re-reading", name);
            CATEGORY_CONFLICTS_TOTAL.inc();
            let category = find_by_name(conn, name)?.ok_or_else(|| {
                CatalogError::Database(format!("Category {:?} missing after conflict", name))
            })?;
            Ok(ResolvedCategory {
                id: category.id,
                created: false,
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn row_to_category(row: &rusqlite::Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
