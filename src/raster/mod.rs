//! Raster metadata access
//!
//! The catalog only needs three things from a raster: its pixel dimensions,
//! its pixel-to-CRS affine transform, and which reprojection applies. This
//! module reads exactly that from TIFF/BigTIFF headers without touching any
//! pixel data.

mod probe;

pub use self::probe::{probe, probe_reader, RasterInfo, CrsKind};
