//! Item catalog persistence.
//!
//! Two tables related by a foreign key: `categories` (name → id, created
//! on first use) and `items`. There is no shared connection: callers get
//! a fresh [`rusqlite::Connection`] from [`Database::connect`] and pass it
//! (or a transaction borrowing it) into the functions of [`categories`]
//! and [`items`].

pub mod categories;
pub mod items;
mod sqlite;
mod types;

pub use sqlite::Database;
pub use types::*;
