//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - The add-item workflow (created items, new categories, failures by stage)
//! - Category creation races recovered by re-reading
//! - Image fallbacks on the serving path

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Items committed by add-item.
pub static ITEMS_ADDED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("bazaar_items_added_total", "Total items added to the catalog").unwrap()
});

/// Categories created on first use.
pub static CATEGORIES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bazaar_categories_created_total",
        "Total categories created by add-item",
    )
    .unwrap()
});

/// Category inserts that lost a race and fell back to a lookup.
pub static CATEGORY_CONFLICTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bazaar_category_conflicts_total",
        "Category inserts recovered after a uniqueness conflict",
    )
    .unwrap()
});

/// Failed add-item requests by stage.
pub static ADD_ITEM_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bazaar_add_item_failures_total",
            "Failed add-item requests by stage",
        ),
        &["stage"], // "validate", "persist_image", "resolve_category", ...
    )
    .unwrap()
});

// =============================================================================
// Image Metrics
// =============================================================================

/// Requests served with the default image because the file was absent.
pub static IMAGE_FALLBACKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bazaar_image_fallbacks_total",
        "Image requests answered with the default image",
    )
    .unwrap()
});

/// All core metrics, for registration in the server registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ITEMS_ADDED_TOTAL.clone()),
        Box::new(CATEGORIES_CREATED_TOTAL.clone()),
        Box::new(CATEGORY_CONFLICTS_TOTAL.clone()),
        Box::new(ADD_ITEM_FAILURES_TOTAL.clone()),
        Box::new(IMAGE_FALLBACKS_TOTAL.clone()),
    ]
}
