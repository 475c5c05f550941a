//! Catalog engine.
//!
//! The only stateful workflow is add-item:
//!
//! ```text
//! Received -> ImagePersisted -> CategoryResolved -> ItemInserted -> Committed
//!                                     \________________\______________-> RolledBack
//! ```
//!
//! Validation happens before any side effect. The image is written before
//! the database transaction opens; category resolution and the item insert
//! share one transaction. Reads (list, get, search, image) are direct calls.

mod error;
mod service;
mod types;

pub use error::{EngineError, ErrorKind};
pub use service::CatalogEngine;
pub use types::{AddItemRequest, AddItemStage, AddedItem, ValidatedItem};
