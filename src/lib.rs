pub mod errors;
pub mod utils;
pub mod geometry;
pub mod raster;
pub mod sensor;
pub mod catalog;
pub mod partition;
pub mod viz;
pub mod commands;
pub mod api;

pub use crate::api::SceneKit;

pub use errors::{SceneError, SceneResult};
pub use catalog::{Catalog, CatalogBuilder, ScanRoot, SceneRecord};
pub use geometry::{extract_footprint, Footprint, GeoPoint, GeoTransform};
pub use partition::{sample_by_ratio, split_into_n, train_test_split, SplitPlan};
