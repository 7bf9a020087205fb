//! Scene footprint polygons
//!
//! A footprint is the ground-projected outline of a raster: its four pixel
//! corners pushed through the geo-referencing pipeline and closed into a
//! ring. Vertices are stored in (longitude, latitude) order, winding
//! top-left, top-right, bottom-right, bottom-left.

use crate::errors::{SceneError, SceneResult};
use crate::geometry::point::GeoPoint;
use crate::geometry::transform::{GeoTransform, Reprojection};

/// Closed footprint polygon of a scene
///
/// Always holds exactly five vertices: the four reprojected raster corners
/// plus a repeat of the first vertex closing the ring.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    vertices: Vec<GeoPoint>,
}

impl Footprint {
    /// Build a footprint from the four corner points, closing the ring
    ///
    /// # Arguments
    /// * `corners` - Corner points in pixel winding order
    ///
    /// # Returns
    /// A closed footprint, or an error if any corner is non-finite
    pub fn from_corners(corners: [GeoPoint; 4]) -> SceneResult<Self> {
        for corner in &corners {
            if !corner.is_finite() {
                return Err(SceneError::GeometryError(format!(
                    "non-finite corner coordinate ({}, {})",
                    corner.lon, corner.lat
                )));
            }
        }

        let mut vertices = corners.to_vec();
        vertices.push(corners[0]);
        Ok(Footprint { vertices })
    }

    /// The five ring vertices (last repeats the first)
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// The four distinct corner vertices
    pub fn corners(&self) -> &[GeoPoint] {
        &self.vertices[..4]
    }

    /// Serialize as a WKT POLYGON string
    pub fn to_wkt(&self) -> String {
        let coords: Vec<String> = self
            .vertices
            .iter()
            .map(|p| format!("{} {}", p.lon, p.lat))
            .collect();
        format!("POLYGON (({}))", coords.join(", "))
    }

    /// Parse a footprint from a WKT POLYGON string
    ///
    /// Accepts the single-ring polygons produced by `to_wkt`.
    pub fn from_wkt(wkt: &str) -> SceneResult<Self> {
        let trimmed = wkt.trim();
        let upper = trimmed.to_ascii_uppercase();
        if !upper.starts_with("POLYGON") {
            return Err(SceneError::GeometryError(format!(
                "not a WKT polygon: {}",
                trimmed
            )));
        }

        let open = trimmed.find("((").ok_or_else(|| {
            SceneError::GeometryError(format!("malformed WKT polygon: {}", trimmed))
        })?;
        let close = trimmed.rfind("))").ok_or_else(|| {
            SceneError::GeometryError(format!("malformed WKT polygon: {}", trimmed))
        })?;

        let mut vertices = Vec::new();
        for pair in trimmed[open + 2..close].split(',') {
            let mut parts = pair.split_whitespace();
            let lon = parts
                .next()
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| {
                    SceneError::GeometryError(format!("bad WKT coordinate: {}", pair))
                })?;
            let lat = parts
                .next()
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| {
                    SceneError::GeometryError(format!("bad WKT coordinate: {}", pair))
                })?;
            vertices.push(GeoPoint::new(lon, lat));
        }

        if vertices.len() != 5 {
            return Err(SceneError::GeometryError(format!(
                "expected a closed 5-vertex ring, got {} vertices",
                vertices.len()
            )));
        }

        let corners = [vertices[0], vertices[1], vertices[2], vertices[3]];
        Footprint::from_corners(corners)
    }
}

/// Derives a scene's geographic footprint from its raster geo-referencing
///
/// The four pixel corners `(0,0), (W,0), (W,H), (0,H)` are pushed through
/// the affine transform and the reprojection, which yields (lat, lon)
/// pairs; components are swapped here so every consumer downstream sees
/// (lon, lat).
///
/// # Arguments
/// * `width` - Raster width in pixels
/// * `height` - Raster height in pixels
/// * `transform` - Pixel-to-CRS affine transform
/// * `reprojection` - CRS-to-geographic conversion
///
/// # Returns
/// The closed footprint polygon, or a geometry error if any transformed
/// coordinate is non-finite
pub fn extract_footprint(
    width: u32,
    height: u32,
    transform: &GeoTransform,
    reprojection: &dyn Reprojection,
) -> SceneResult<Footprint> {
    let (w, h) = (f64::from(width), f64::from(height));
    let pixel_corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];

    let mut corners = [GeoPoint::new(0.0, 0.0); 4];
    for (i, (px, py)) in pixel_corners.iter().enumerate() {
        let (x, y) = transform.apply(*px, *py);
        let (lat, lon) = reprojection.to_geographic(x, y);
        corners[i] = GeoPoint::new(lon, lat);
    }

    Footprint::from_corners(corners)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::transform::GeographicCrs;

    #[test]
    fn identity_transform_yields_pixel_corner_ring() {
        let footprint =
            extract_footprint(200, 100, &GeoTransform::identity(), &GeographicCrs).unwrap();

        let expected = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(200.0, 0.0),
            GeoPoint::new(200.0, 100.0),
            GeoPoint::new(0.0, 100.0),
        ];
        assert_eq!(footprint.corners(), &expected);

        // Ring is closed by repeating the first vertex
        assert_eq!(footprint.vertices().len(), 5);
        assert_eq!(footprint.vertices()[4], footprint.vertices()[0]);
    }

    #[test]
    fn non_finite_coordinate_is_a_geometry_error() {
        let transform = GeoTransform::new([f64::NAN, 1.0, 0.0, 0.0, 0.0, 1.0]);
        let result = extract_footprint(10, 10, &transform, &GeographicCrs);
        assert!(matches!(result, Err(SceneError::GeometryError(_))));
    }

    #[test]
    fn wkt_round_trip_preserves_vertices() {
        let footprint =
            extract_footprint(64, 32, &GeoTransform::north_up(8.5, 47.2, 0.001, 0.001),
                              &GeographicCrs)
                .unwrap();

        let parsed = Footprint::from_wkt(&footprint.to_wkt()).unwrap();
        for (a, b) in footprint.vertices().iter().zip(parsed.vertices()) {
            assert!(a.approx_eq(b, 1e-9));
        }
    }
}
