pub mod catalog;
pub mod points;

// Re-export for convenience
pub use catalog::{CatalogFile, StaticCatalog};
pub use points::DigestPointsProvider;
