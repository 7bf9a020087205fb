//! CSV import and export for catalogs
//!
//! One row per record, one column per attribute, footprints serialized as
//! WKT polygons. Export and import round-trip: re-importing a written file
//! reproduces the catalog. Import is also the channel through which the
//! externally labeled `region` and `inferred` columns come back in.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::record::SceneRecord;
use crate::catalog::store::Catalog;
use crate::errors::SceneResult;
use crate::geometry::Footprint;

/// Flat row shape used for CSV serialization
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    sensor: String,
    path: String,
    name: String,
    extension: String,
    annotated: bool,
    region: Option<String>,
    inferred: Option<bool>,
    footprint: String,
}

/// Writes a catalog to a CSV file
///
/// # Arguments
/// * `catalog` - Catalog to export
/// * `path` - Destination CSV path
pub fn export_csv(catalog: &Catalog, path: &Path) -> SceneResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for record in catalog {
        writer.serialize(CsvRow {
            sensor: record.sensor.clone(),
            path: record.path.to_string_lossy().into_owned(),
            name: record.name.clone(),
            extension: record.extension.clone(),
            annotated: record.annotated,
            region: record.region.clone(),
            inferred: record.inferred,
            footprint: record.footprint.to_wkt(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Reads a catalog back from a CSV file
///
/// # Arguments
/// * `path` - CSV file previously written by `export_csv` (possibly with
///   `region`/`inferred` columns filled in externally)
pub fn import_csv(path: &Path) -> SceneResult<Catalog> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut catalog = Catalog::new();

    for row in reader.deserialize() {
        let row: CsvRow = row?;
        catalog.push(SceneRecord {
            sensor: row.sensor,
            path: PathBuf::from(row.path),
            name: row.name,
            extension: row.extension,
            annotated: row.annotated,
            footprint: Footprint::from_wkt(&row.footprint)?,
            region: row.region,
            inferred: row.inferred,
        });
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{extract_footprint, GeoTransform, GeographicCrs};

    fn sample_catalog() -> Catalog {
        let footprint =
            extract_footprint(100, 50, &GeoTransform::north_up(8.5, 47.25, 0.01, 0.01),
                              &GeographicCrs)
                .unwrap();

        let mut record = SceneRecord {
            sensor: "K3".to_string(),
            path: PathBuf::from("/scenes/north/K3/scene_001.tif"),
            name: "scene_001".to_string(),
            extension: "tif".to_string(),
            annotated: true,
            footprint,
            region: Some("north".to_string()),
            inferred: None,
        };

        let mut catalog = Catalog::new();
        catalog.push(record.clone());
        record.name = "scene_002".to_string();
        record.region = None;
        record.annotated = false;
        catalog.push(record);
        catalog
    }

    #[test]
    fn csv_round_trip_preserves_records() {
        let catalog = sample_catalog();
        let csv_path = std::env::temp_dir().join("scenekit_csv_roundtrip.csv");

        export_csv(&catalog, &csv_path).unwrap();
        let restored = import_csv(&csv_path).unwrap();
        std::fs::remove_file(&csv_path).ok();

        assert_eq!(restored.len(), catalog.len());
        for (a, b) in catalog.iter().zip(restored.iter()) {
            assert_eq!(a.sensor, b.sensor);
            assert_eq!(a.path, b.path);
            assert_eq!(a.name, b.name);
            assert_eq!(a.extension, b.extension);
            assert_eq!(a.annotated, b.annotated);
            assert_eq!(a.region, b.region);
            assert_eq!(a.inferred, b.inferred);
            for (v, w) in a.footprint.vertices().iter().zip(b.footprint.vertices()) {
                assert!(v.approx_eq(w, 1e-9));
            }
        }
    }
}
