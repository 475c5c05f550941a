//! The catalog engine: add-item workflow and read operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, error, info};

use super::error::EngineError;
use super::types::{AddItemRequest, AddItemStage, AddedItem, ValidatedItem};
use crate::catalog::{
    categories, items, CatalogError, Database, Item, ItemId, ItemSummary, NewItem,
    ResolvedCategory,
};
use crate::images::{ImageError, ImageStore, StoredImage};
use crate::metrics::{ADD_ITEM_FAILURES_TOTAL, CATEGORIES_CREATED_TOTAL, ITEMS_ADDED_TOTAL};

/// Orchestrates the image store and the catalog database.
///
/// Cheap to clone; holds no connection. Database work runs on the blocking
/// pool with a connection opened for that call only.
#[derive(Clone)]
pub struct CatalogEngine {
    db: Database,
    images: Arc<dyn ImageStore>,
}

impl CatalogEngine {
    pub fn new(db: Database, images: Arc<dyn ImageStore>) -> Self {
        Self { db, images }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn images(&self) -> &dyn ImageStore {
        self.images.as_ref()
    }

    /// Validates the request, stores the image, then resolves the category
    /// and inserts the item in one transaction.
    ///
    /// The image is written outside the transaction and is not removed if
    /// the transaction fails.
    pub async fn add_item(&self, request: AddItemRequest) -> Result<AddedItem, EngineError> {
        let result = self.try_add_item(request).await;

        match &result {
            Ok(added) => {
                ITEMS_ADDED_TOTAL.inc();
                if added.category_created {
                    CATEGORIES_CREATED_TOTAL.inc();
                }
                info!(
                    "Added item {} ({:?}, category {:?}, image {})",
                    added.id, added.name, added.category, added.image_name
                );
            }
            Err(e) => record_failure(e),
        }

        result
    }

    /// Reports an add-item whose image upload broke off before the bytes
    /// were complete. Nothing has been stored at this point.
    pub fn upload_interrupted(&self, source: std::io::Error) -> EngineError {
        let e = EngineError::SourceUnreadable(ImageError::SourceUnreadable(source));
        record_failure(&e);
        e
    }

    async fn try_add_item(&self, request: AddItemRequest) -> Result<AddedItem, EngineError> {
        let item = request.validate()?;

        let mut source: &[u8] = &item.image;
        let image_name = self
            .images
            .put(&mut source)
            .await
            .map_err(|e| EngineError::from_image(Some(AddItemStage::PersistImage), e))?;

        let abandoned = Arc::new(AtomicBool::new(false));
        let _guard = AbandonOnDrop(Arc::clone(&abandoned));

        let db = self.db.clone();
        let name = item.name.clone();
        let category = item.category.clone();
        let stored_name = image_name.clone();
        let (resolved, id) = tokio::task::spawn_blocking(move || {
            commit_item(&db, &item, &stored_name, &abandoned)
        })
        .await
        .map_err(|e| EngineError::Worker(e.to_string()))??;

        Ok(AddedItem {
            id,
            name,
            category,
            category_id: resolved.id,
            image_name,
            category_created: resolved.created,
        })
    }

    /// Every item with its category name, in insertion order.
    pub async fn list_items(&self) -> Result<Vec<Item>, EngineError> {
        self.with_connection(|conn| items::list_all(conn)).await
    }

    pub async fn get_item(&self, id: ItemId) -> Result<Item, EngineError> {
        self.with_connection(move |conn| items::get_by_id(conn, id)).await
    }

    /// Substring search on item names. The empty keyword matches everything.
    pub async fn search_items(&self, keyword: &str) -> Result<Vec<ItemSummary>, EngineError> {
        let keyword = keyword.to_string();
        self.with_connection(move |conn| items::search_by_name(conn, &keyword)).await
    }

    /// Loads an image, substituting the default image when it is absent.
    pub async fn get_image(&self, name: &str) -> Result<StoredImage, EngineError> {
        self.images
            .get(name)
            .await
            .map_err(|e| EngineError::from_image(None, e))
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, CatalogError> + Send + 'static,
    {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = db.connect()?;
            f(&conn)
        })
        .await
        .map_err(|e| EngineError::Worker(e.to_string()))?;

        result.map_err(|e| {
            let e = EngineError::from(e);
            if !e.is_client_error() {
                error!("Catalog read failed: {}", e);
            }
            e
        })
    }
}

fn record_failure(e: &EngineError) {
    let stage = e.stage().unwrap_or(AddItemStage::Validate);
    ADD_ITEM_FAILURES_TOTAL
        .with_label_values(&[stage.as_str()])
        .inc();
    if e.is_client_error() {
        debug!("Rejected add-item request: {}", e);
    } else {
        error!("Failed to add item at {}: {:?}", stage, e);
    }
}

/// Marks the add-item as abandoned when the request future is dropped.
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Category resolution and item insert in one IMMEDIATE transaction.
/// Returning early drops the transaction, which rolls it back.
fn commit_item(
    db: &Database,
    item: &ValidatedItem,
    image_name: &str,
    abandoned: &AtomicBool,
) -> Result<(ResolvedCategory, ItemId), EngineError> {
    let mut conn = db
        .connect()
        .map_err(|e| EngineError::at_stage(AddItemStage::OpenTransaction, e))?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| EngineError::at_stage(AddItemStage::OpenTransaction, e.into()))?;

    let category = categories::resolve_or_create(&tx, &item.category)
        .map_err(|e| EngineError::at_stage(AddItemStage::ResolveCategory, e))?;

    let id = items::insert(
        &tx,
        &NewItem {
            name: item.name.clone(),
            category_id: category.id,
            image_name: image_name.to_string(),
        },
    )
    .map_err(|e| EngineError::at_stage(AddItemStage::InsertItem, e))?;

    if abandoned.load(Ordering::SeqCst) {
        return Err(EngineError::Cancelled);
    }

    tx.commit()
        .map_err(|e| EngineError::at_stage(AddItemStage::Commit, e.into()))?;

    Ok((category, id))
}
