//! Footprint map rendering
//!
//! Builds the styled-polygon and legend model for a catalog and renders it
//! into a self-contained Leaflet HTML document. The model itself carries no
//! rendering logic, so other renderers can consume it directly.

use std::fs;
use std::path::Path;

use crate::catalog::store::Catalog;
use crate::errors::SceneResult;
use crate::geometry::GeoPoint;
use crate::sensor::sensor_color;

/// Stroke/fill color for sensors without a registry entry
const FALLBACK_COLOR: &str = "#808080";

/// Fill opacity used for every footprint
const FILL_OPACITY: f64 = 0.1;

/// One footprint styled for rendering
#[derive(Debug, Clone)]
pub struct StyledPolygon {
    /// Ring vertices in (lon, lat) order
    pub vertices: Vec<GeoPoint>,
    /// Stroke and fill color
    pub color: String,
    /// Fill opacity
    pub fill_opacity: f64,
    /// Tooltip label (the scene name)
    pub label: String,
}

/// One legend row: a sensor and its color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Sensor identifier
    pub sensor: String,
    /// Display color
    pub color: String,
}

/// Renderable map model of a catalog's footprints
#[derive(Debug, Clone, Default)]
pub struct SceneMap {
    polygons: Vec<StyledPolygon>,
    legend: Vec<LegendEntry>,
}

impl SceneMap {
    /// Builds the map model from a catalog
    ///
    /// Emits one styled polygon per record, color-keyed by sensor, and one
    /// legend entry per distinct sensor present.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut map = SceneMap::default();

        for sensor in catalog.sensors() {
            let color = sensor_color(&sensor).unwrap_or(FALLBACK_COLOR).to_string();
            map.legend.push(LegendEntry { sensor, color });
        }

        for record in catalog {
            let color = sensor_color(&record.sensor)
                .unwrap_or(FALLBACK_COLOR)
                .to_string();
            map.polygons.push(StyledPolygon {
                vertices: record.footprint.vertices().to_vec(),
                color,
                fill_opacity: FILL_OPACITY,
                label: record.name.clone(),
            });
        }

        map
    }

    /// The styled polygons
    pub fn polygons(&self) -> &[StyledPolygon] {
        &self.polygons
    }

    /// The legend entries
    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Renders the map as a self-contained Leaflet HTML document
    pub fn to_html(&self) -> String {
        let mut body = String::new();

        for polygon in &self.polygons {
            let ring: Vec<String> = polygon
                .vertices
                .iter()
                .map(|p| format!("[{}, {}]", p.lat, p.lon))
                .collect();
            body.push_str(&format!(
                "L.polygon([{ring}], {{color: '{color}', weight: 2, fill: true, \
                 fillColor: '{color}', fillOpacity: {opacity}}})\
                 .bindTooltip('{label}').addTo(map);\n",
                ring = ring.join(", "),
                color = polygon.color,
                opacity = polygon.fill_opacity,
                label = polygon.label.replace('\'', "\\'"),
            ));
        }

        let legend_items: Vec<String> = self
            .legend
            .iter()
            .map(|entry| {
                format!(
                    "<li><span style='background:{};opacity:0.7;'></span>{}</li>",
                    entry.color, entry.sensor
                )
            })
            .collect();

        format!(
            "{}{}{}{}{}",
            HTML_HEAD,
            body,
            LEGEND_OPEN,
            legend_items.join("\n"),
            HTML_TAIL
        )
    }

    /// Writes the rendered HTML document to a file
    pub fn save(&self, path: &Path) -> SceneResult<()> {
        fs::write(path, self.to_html())?;
        Ok(())
    }
}

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Scene footprints</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .maplegend {
    position: absolute; z-index: 9999; border: 2px solid grey;
    background-color: rgba(255, 255, 255, 0.8); border-radius: 6px;
    padding: 10px; font-size: 14px; right: 20px; bottom: 20px;
  }
  .maplegend .legend-title { font-weight: bold; margin-bottom: 5px; }
  .maplegend ul { margin: 0; padding: 0; list-style: none; }
  .maplegend li { line-height: 18px; margin-bottom: 2px; }
  .maplegend li span {
    display: inline-block; height: 16px; width: 30px;
    margin-right: 5px; border: 1px solid #999; vertical-align: middle;
  }
</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([0, 0], 2);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
var bounds = [];
map.on('layeradd', function (e) {
  if (e.layer.getBounds) { bounds.push(e.layer.getBounds()); }
});
</script>
<script>
"#;

const LEGEND_OPEN: &str = r#"if (bounds.length) {
  var all = bounds[0];
  for (var i = 1; i < bounds.length; i++) { all.extend(bounds[i]); }
  map.fitBounds(all);
}
</script>
<div class="maplegend">
  <div class="legend-title">Sensor</div>
  <ul>
"#;

const HTML_TAIL: &str = r#"
  </ul>
</div>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::record::SceneRecord;
    use crate::geometry::{extract_footprint, GeoTransform, GeographicCrs};
    use std::path::PathBuf;

    fn record(name: &str, sensor: &str) -> SceneRecord {
        SceneRecord {
            sensor: sensor.to_string(),
            path: PathBuf::from(format!("/scenes/{}.tif", name)),
            name: name.to_string(),
            extension: "tif".to_string(),
            annotated: false,
            footprint: extract_footprint(10, 10, &GeoTransform::identity(), &GeographicCrs)
                .unwrap(),
            region: None,
            inferred: None,
        }
    }

    #[test]
    fn one_polygon_per_record_one_legend_entry_per_sensor() {
        let catalog = Catalog::from_records(vec![
            record("a", "WV3"),
            record("b", "WV3"),
            record("c", "K3"),
        ]);

        let map = SceneMap::from_catalog(&catalog);
        assert_eq!(map.polygons().len(), 3);
        assert_eq!(map.legend().len(), 2);
        assert_eq!(map.legend()[0].sensor, "WV3");
        assert_eq!(map.legend()[0].color, "#F423E8");
    }

    #[test]
    fn unknown_sensor_gets_fallback_color() {
        let catalog = Catalog::from_records(vec![record("a", "UNKNOWN")]);
        let map = SceneMap::from_catalog(&catalog);
        assert_eq!(map.legend()[0].color, FALLBACK_COLOR);
    }

    #[test]
    fn html_contains_polygons_and_legend() {
        let catalog = Catalog::from_records(vec![record("scene_a", "WV3")]);
        let html = SceneMap::from_catalog(&catalog).to_html();

        assert!(html.contains("L.polygon"));
        assert!(html.contains("scene_a"));
        assert!(html.contains("#F423E8"));
        assert!(html.contains("legend-title"));
    }
}
