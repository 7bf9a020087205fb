//! Geometry handling for scene footprints
//!
//! This module provides structures and functionality for mapping raster
//! pixel coordinates into geographic space and building footprint polygons.

mod point;
mod transform;
mod footprint;

// Re-export key types
pub use self::point::GeoPoint;
pub use self::transform::{GeoTransform, Reprojection, GeographicCrs, WebMercatorCrs};
pub use self::footprint::{Footprint, extract_footprint};
