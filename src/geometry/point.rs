//! Geographic point structure

/// A point in geographic coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new geographic point
    pub fn new(lon: f64, lat: f64) -> Self {
        GeoPoint { lon, lat }
    }

    /// Check that both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Approximate equality within the given tolerance
    pub fn approx_eq(&self, other: &GeoPoint, tolerance: f64) -> bool {
        (self.lon - other.lon).abs() <= tolerance && (self.lat - other.lat).abs() <= tolerance
    }
}
