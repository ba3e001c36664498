// Adapters layer: concrete drug catalog sources (in-memory files, HTTP).

pub mod catalog;

pub use catalog::{build_catalog, HttpCatalog, InMemoryCatalog};
