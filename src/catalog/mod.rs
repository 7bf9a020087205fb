//! Scene catalog construction and bookkeeping
//!
//! This module provides the catalog record type, the in-memory catalog
//! store with its filtering and deduplication operations, the directory
//! walker that builds catalogs, and CSV import/export.

pub mod record;
pub mod store;
pub mod builder;
pub mod csv_io;

pub use record::SceneRecord;
pub use store::Catalog;
pub use builder::{CatalogBuilder, ScanRoot};
pub use csv_io::{export_csv, import_csv};
