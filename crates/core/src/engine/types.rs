//! Request and result types for the catalog engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use crate::catalog::{CategoryId, ItemId};

/// Steps of the add-item workflow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddItemStage {
    Validate,
    PersistImage,
    OpenTransaction,
    ResolveCategory,
    InsertItem,
    Commit,
}

impl AddItemStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddItemStage::Validate => "validate",
            AddItemStage::PersistImage => "persist_image",
            AddItemStage::OpenTransaction => "open_transaction",
            AddItemStage::ResolveCategory => "resolve_category",
            AddItemStage::InsertItem => "insert_item",
            AddItemStage::Commit => "commit",
        }
    }
}

impl fmt::Display for AddItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An add-item request as received from the boundary. Every field may be
/// missing; [`AddItemRequest::validate`] decides.
#[derive(Debug, Clone, Default)]
pub struct AddItemRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl AddItemRequest {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            category: Some(category.into()),
            image: Some(image.into()),
        }
    }

    /// Trims name and category and requires all three fields to be present
    /// and non-empty.
    pub fn validate(self) -> Result<ValidatedItem, EngineError> {
        let name = required_text(self.name, "name")?;
        let category = required_text(self.category, "category")?;
        let image = match self.image {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Err(EngineError::BadInput("image is required".to_string())),
        };

        Ok(ValidatedItem {
            name,
            category,
            image,
        })
    }
}

fn required_text(value: Option<String>, field: &str) -> Result<String, EngineError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(EngineError::BadInput(format!("{} is required", field))),
    }
}

/// An add-item request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedItem {
    pub name: String,
    pub category: String,
    pub image: Vec<u8>,
}

/// Result of a committed add-item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub category_id: CategoryId,
    pub image_name: String,
    /// True if this request created the category.
    pub category_created: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_fields() {
        let item = AddItemRequest::new("  mug ", "kitchen\n", b"img".to_vec())
            .validate()
            .unwrap();
        assert_eq!(item.name, "mug");
        assert_eq!(item.category, "kitchen");
        assert_eq!(item.image, b"img");
    }

    #[test]
    fn test_validate_missing_fields() {
        let cases = [
            (
                AddItemRequest {
                    name: None,
                    ..AddItemRequest::new("mug", "kitchen", b"img".to_vec())
                },
                "name is required",
            ),
            (
                AddItemRequest {
                    category: Some("   ".to_string()),
                    ..AddItemRequest::new("mug", "kitchen", b"img".to_vec())
                },
                "category is required",
            ),
            (
                AddItemRequest {
                    image: Some(Vec::new()),
                    ..AddItemRequest::new("mug", "kitchen", b"img".to_vec())
                },
                "image is required",
            ),
            (AddItemRequest::default(), "name is required"),
        ];

        for (request, message) in cases {
            match request.validate() {
                Err(EngineError::BadInput(m)) => assert_eq!(m, message),
                other => panic!("expected BadInput({message}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(
            serde_json::to_string(&AddItemStage::ResolveCategory).unwrap(),
            "\"resolve_category\""
        );
        assert_eq!(AddItemStage::PersistImage.to_string(), "persist_image");
    }
}
