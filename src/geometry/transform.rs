//! Pixel-to-geographic coordinate transformation
//!
//! A raster's geo-referencing is an affine transform from pixel space into
//! its native coordinate reference system, followed by a reprojection of the
//! native coordinates into geographic latitude/longitude.

use std::f64::consts::PI;

/// Affine pixel-to-CRS transform in GDAL coefficient order
///
/// `x = c0 + px * c1 + py * c2` and `y = c3 + px * c4 + py * c5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub coefficients: [f64; 6],
}

impl GeoTransform {
    /// Create a transform from the six GDAL-ordered coefficients
    pub fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform { coefficients }
    }

    /// The identity transform (pixel coordinates are CRS coordinates)
    pub fn identity() -> Self {
        GeoTransform::new([0.0, 1.0, 0.0, 0.0, 0.0, 1.0])
    }

    /// Build a north-up transform from an origin and pixel sizes
    ///
    /// # Arguments
    /// * `origin_x` - CRS x of the top-left raster corner
    /// * `origin_y` - CRS y of the top-left raster corner
    /// * `pixel_width` - CRS units per pixel along x
    /// * `pixel_height` - CRS units per pixel along y (positive; rows go south)
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform::new([origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height])
    }

    /// Apply the transform to a pixel coordinate
    pub fn apply(&self, px: f64, py: f64) -> (f64, f64) {
        let c = &self.coefficients;
        let x = c[0] + px * c[1] + py * c[2];
        let y = c[3] + px * c[4] + py * c[5];
        (x, y)
    }
}

/// Reprojection from a raster's native CRS into geographic coordinates
///
/// Implementations return `(lat, lon)` pairs; the footprint extractor is the
/// one place that swaps them into `(lon, lat)` order for downstream use.
pub trait Reprojection {
    /// Convert native CRS coordinates to geographic (lat, lon)
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64);
}

/// Native CRS is already geographic longitude/latitude (EPSG:4326)
pub struct GeographicCrs;

impl Reprojection for GeographicCrs {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        (y, x)
    }
}

/// Web Mercator (EPSG:3857) native coordinates
pub struct WebMercatorCrs;

impl WebMercatorCrs {
    /// Earth radius in meters
    const EARTH_RADIUS: f64 = 6378137.0;
}

impl Reprojection for WebMercatorCrs {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        // Convert to longitude/latitude
        let lon = x * 180.0 / (Self::EARTH_RADIUS * PI);
        let lat = 180.0 / PI * (2.0 * f64::atan(f64::exp(y / Self::EARTH_RADIUS)) - PI / 2.0);
        (lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_keeps_pixel_coordinates() {
        let transform = GeoTransform::identity();
        assert_eq!(transform.apply(12.0, 34.0), (12.0, 34.0));
    }

    #[test]
    fn north_up_transform_moves_south_with_rows() {
        let transform = GeoTransform::north_up(100.0, 50.0, 0.5, 0.5);
        let (x, y) = transform.apply(10.0, 20.0);
        assert_eq!(x, 105.0);
        assert_eq!(y, 40.0);
    }

    #[test]
    fn web_mercator_origin_maps_to_null_island() {
        let (lat, lon) = WebMercatorCrs.to_geographic(0.0, 0.0);
        assert!(lat.abs() < 1e-9);
        assert!(lon.abs() < 1e-9);
    }
}
