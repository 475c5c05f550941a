//! Item repository.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{CatalogError, Item, ItemId, ItemSummary, NewItem};

const SELECT_ITEM: &str = "SELECT i.id, i.name, c.name, i.category_id, i.image_name, i.created_at
     FROM items i
     JOIN categories c ON c.id = i.category_id";

/// Inserts one item.
///
/// A `category_id` that references no category is rejected by the foreign
/// key and reported as [`CatalogError::ConstraintViolation`].
pub fn insert(conn: &Connection, item: &NewItem) -> Result<ItemId, CatalogError> {
    conn.execute(
        "INSERT INTO items (name, category_id, image_name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            &item.name,
            item.category_id,
            &item.image_name,
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: ItemId) -> Result<Item, CatalogError> {
    conn.query_row(
        &format!("{} WHERE i.id = ?1", SELECT_ITEM),
        params![id],
        row_to_item,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(format!("item {}", id)),
        _ => e.into(),
    })
}

/// Every item with its category name, in insertion (id) order.
pub fn list_all(conn: &Connection) -> Result<Vec<Item>, CatalogError> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY i.id", SELECT_ITEM))?;
    let rows = stmt.query_map([], row_to_item)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// Items whose name contains `keyword`, in id order.
///
/// Matching is SQLite `LIKE`: ASCII case-insensitive, no Unicode folding.
/// Wildcards in the keyword match literally. An empty keyword matches
/// every item.
pub fn search_by_name(conn: &Connection, keyword: &str) -> Result<Vec<ItemSummary>, CatalogError> {
    let pattern = format!("%{}%", escape_like(keyword));

    let mut stmt = conn.prepare(
        "SELECT i.name, c.name
         FROM items i
         JOIN categories c ON c.id = i.category_id
         WHERE i.name LIKE ?1 ESCAPE '\\'
         ORDER BY i.id",
    )?;
    let rows = stmt.query_map(params![pattern], |row| {
        Ok(ItemSummary {
            name: row.get(0)?,
            category: row.get(1)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<Item> {
    let created_at_str: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        category_id: row.get(3)?,
        image_name: row.get(4)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{categories, Database};
    use tempfile::TempDir;

    fn create_test_db() -> (TempDir, Database) {
        let temp = TempDir::new().unwrap();
        let db = Database::open(&temp.path().join("catalog.sqlite3")).unwrap();
        (temp, db)
    }

    fn add(conn: &Connection, name: &str, category: &str, image_name: &str) -> ItemId {
        let category_id = categories::resolve_or_create(conn, category).unwrap().id;
        insert(
            conn,
            &NewItem {
                name: name.to_string(),
                category_id,
                image_name: image_name.to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();

        let id = add(&conn, "mug", "kitchen", "abc.jpg");
        let item = get_by_id(&conn, id).unwrap();

        assert_eq!(item.id, id);
        assert_eq!(item.name, "mug");
        assert_eq!(item.category, "kitchen");
        assert_eq!(item.image_name, "abc.jpg");
    }

    #[test]
    fn test_get_nonexistent() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();

        let result = get_by_id(&conn, 42);
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_insert_with_unknown_category_violates_constraint() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();

        let result = insert(
            &conn,
            &NewItem {
                name: "orphan".to_string(),
                category_id: 999,
                image_name: "abc.jpg".to_string(),
            },
        );

        assert!(matches!(result, Err(CatalogError::ConstraintViolation(_))));
        assert!(list_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_list_all_in_insertion_order() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();

        add(&conn, "mug", "kitchen", "a.jpg");
        add(&conn, "rake", "garden", "b.jpg");
        add(&conn, "pan", "kitchen", "c.jpg");

        let items = list_all(&conn).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        let categories: Vec<&str> = items.iter().map(|i| i.category.as_str()).collect();
        assert_eq!(names, vec!["mug", "rake", "pan"]);
        assert_eq!(categories, vec!["kitchen", "garden", "kitchen"]);
    }

    #[test]
    fn test_search_by_substring() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();
        add(&conn, "mug", "kitchen", "a.jpg");
        add(&conn, "rake", "garden", "b.jpg");

        let results = search_by_name(&conn, "mu").unwrap();

        assert_eq!(
            results,
            vec![ItemSummary {
                name: "mug".to_string(),
                category: "kitchen".to_string(),
            }]
        );
    }

    #[test]
    fn test_search_case_insensitive() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();
        add(&conn, "Coffee Mug", "kitchen", "a.jpg");

        assert_eq!(search_by_name(&conn, "MUG").unwrap().len(), 1);
        assert_eq!(search_by_name(&conn, "coffee").unwrap().len(), 1);
    }

    #[test]
    fn test_search_empty_keyword_matches_all() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();
        add(&conn, "mug", "kitchen", "a.jpg");
        add(&conn, "rake", "garden", "b.jpg");

        assert_eq!(search_by_name(&conn, "").unwrap().len(), 2);
    }

    #[test]
    fn test_search_wildcards_are_literal() {
        let (_temp, db) = create_test_db();
        let conn = db.connect().unwrap();
        add(&conn, "100% cotton", "clothes", "a.jpg");
        add(&conn, "cotton_shirt", "clothes", "b.jpg");
        add(&conn, "mug", "kitchen", "c.jpg");

        let percent = search_by_name(&conn, "%").unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].name, "100% cotton");

        let underscore = search_by_name(&conn, "_").unwrap();
        assert_eq!(underscore.len(), 1);
        assert_eq!(underscore[0].name, "cotton_shirt");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a%b_c\\d"), "a\\%b\\_c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }
}
