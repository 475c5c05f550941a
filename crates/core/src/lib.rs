pub mod catalog;
pub mod config;
pub mod engine;
pub mod images;
pub mod metrics;

pub use catalog::{
    CatalogError, Category, CategoryId, Database, Item, ItemId, ItemSummary, NewItem,
    ResolvedCategory,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, CorsConfig,
    DatabaseConfig, ImagesConfig, ServerConfig,
};
pub use engine::{AddItemRequest, AddItemStage, AddedItem, CatalogEngine, EngineError, ErrorKind};
pub use images::{FsImageStore, ImageError, ImageStore, StoredImage, DEFAULT_IMAGE_NAME};
