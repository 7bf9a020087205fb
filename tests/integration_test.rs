//! Integration tests for catalog building and partitioning
//!
//! Builds a synthetic scene tree of minimal GeoTIFF files on disk, then
//! exercises the walk-probe-catalog pipeline and the downstream split,
//! export and transfer operations against it.

use byteorder::{LittleEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf};

use scenekit::catalog::{export_csv, import_csv};
use scenekit::partition::{split_into_n, train_test_split, TransferExecutor};
use scenekit::utils::logger::Logger;
use scenekit::{Catalog, CatalogBuilder, ScanRoot};

/// Builds a minimal little-endian GeoTIFF: dimensions plus a
/// tiepoint/pixel-scale pair, no pixel data
fn geotiff_bytes(width: u32, height: u32, origin: (f64, f64), scale: (f64, f64)) -> Vec<u8> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.extend_from_slice(&[0x49, 0x49]); // "II" for little-endian
    buffer.extend_from_slice(&[42, 0]);      // TIFF magic number
    buffer.extend_from_slice(&[8, 0, 0, 0]); // Offset to first IFD

    let entry_count: u16 = 4;
    let data_start: u32 = 8 + 2 + u32::from(entry_count) * 12 + 4;

    buffer.write_u16::<LittleEndian>(entry_count).unwrap();

    // ImageWidth (tag 256, LONG)
    buffer.write_u16::<LittleEndian>(256).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(width).unwrap();

    // ImageLength (tag 257, LONG)
    buffer.write_u16::<LittleEndian>(257).unwrap();
    buffer.write_u16::<LittleEndian>(4).unwrap();
    buffer.write_u32::<LittleEndian>(1).unwrap();
    buffer.write_u32::<LittleEndian>(height).unwrap();

    // ModelPixelScale (tag 33550, DOUBLE x3)
    buffer.write_u16::<LittleEndian>(33550).unwrap();
    buffer.write_u16::<LittleEndian>(12).unwrap();
    buffer.write_u32::<LittleEndian>(3).unwrap();
    buffer.write_u32::<LittleEndian>(data_start).unwrap();

    // ModelTiepoint (tag 33922, DOUBLE x6)
    buffer.write_u16::<LittleEndian>(33922).unwrap();
    buffer.write_u16::<LittleEndian>(12).unwrap();
    buffer.write_u32::<LittleEndian>(6).unwrap();
    buffer.write_u32::<LittleEndian>(data_start + 24).unwrap();

    // No further IFDs
    buffer.write_u32::<LittleEndian>(0).unwrap();

    for v in [scale.0, scale.1, 0.0] {
        buffer.write_f64::<LittleEndian>(v).unwrap();
    }
    for v in [0.0, 0.0, 0.0, origin.0, origin.1, 0.0] {
        buffer.write_f64::<LittleEndian>(v).unwrap();
    }

    buffer
}

/// Writes one scene file (and optionally its sidecar label) into a tree
fn write_scene(dir: &Path, name: &str, annotated: bool) {
    fs::create_dir_all(dir).unwrap();
    let scene = geotiff_bytes(64, 32, (8.0, 47.0), (0.001, 0.001));
    fs::write(dir.join(format!("{}.tif", name)), scene).unwrap();
    if annotated {
        fs::write(dir.join(format!("{}.label", name)), b"labeled").unwrap();
    }
}

/// Creates a fresh scene tree under a unique temp directory
fn scene_tree(test_name: &str) -> PathBuf {
    let root = std::env::temp_dir()
        .join("scenekit_it")
        .join(format!("{}_{}", test_name, std::process::id()));
    fs::remove_dir_all(&root).ok();

    let scenes = root.join("scenes");
    write_scene(&scenes.join("north/WV3/scene_001"), "scene_001", true);
    write_scene(&scenes.join("north/WV3/scene_002"), "scene_002", false);
    write_scene(&scenes.join("north/K3/scene_003"), "scene_003", true);
    write_scene(&scenes.join("south/K3/scene_004"), "scene_004", false);
    // Duplicate name in a different directory
    write_scene(&scenes.join("south/K3/dup/scene_004"), "scene_004", false);
    // Not a raster at all; the walk must survive it
    let junk_dir = scenes.join("south/K3/junk");
    fs::create_dir_all(&junk_dir).unwrap();
    fs::write(junk_dir.join("broken.tif"), b"not a tiff").unwrap();
    // Wrong extension, never picked up
    fs::write(scenes.join("north/readme.txt"), b"notes").unwrap();

    root
}

fn build_catalog(root: &Path, logger: &Logger) -> Catalog {
    CatalogBuilder::new(logger)
        .root(ScanRoot::new(root))
        .build()
        .unwrap()
}

/// Attaches regions derived from the path so partitioning can group
fn label_regions(catalog: &Catalog) -> Catalog {
    let mut labeled = Catalog::new();
    for record in catalog.iter() {
        let mut record = record.clone();
        let path = record.path.to_string_lossy().into_owned();
        record.region = Some(if path.contains("north") {
            "north".to_string()
        } else {
            "south".to_string()
        });
        labeled.push(record);
    }
    labeled
}

#[test]
fn test_catalog_build_from_scene_tree() {
    let root = scene_tree("build");
    let logger = Logger::new("integration_test.log").unwrap();

    let catalog = build_catalog(&root, &logger);

    // 5 valid scenes; the broken tif and the txt file are skipped
    assert_eq!(catalog.len(), 5);
    assert_eq!(catalog.count_annotated(), 2);

    let sensors = catalog.counts_by_sensor();
    let wv3 = sensors.iter().find(|(s, _)| s == "WV3").unwrap();
    let k3 = sensors.iter().find(|(s, _)| s == "K3").unwrap();
    assert_eq!(wv3.1, 2);
    assert_eq!(k3.1, 3);

    // Footprint of a 64x32 raster at (8, 47) with 0.001 degree pixels
    let record = catalog
        .iter()
        .find(|r| r.name == "scene_001")
        .unwrap();
    let corners = record.footprint.corners();
    assert!((corners[0].lon - 8.0).abs() < 1e-9);
    assert!((corners[0].lat - 47.0).abs() < 1e-9);
    assert!((corners[2].lon - 8.064).abs() < 1e-9);
    assert!((corners[2].lat - 46.968).abs() < 1e-9);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_duplicate_detection_and_exclusion() {
    let root = scene_tree("dedup");
    let logger = Logger::new("integration_test.log").unwrap();

    let mut catalog = build_catalog(&root, &logger);

    let duplicated = catalog.duplicated();
    assert_eq!(duplicated.len(), 2);
    assert!(duplicated.iter().all(|r| r.name == "scene_004"));

    catalog.exclude_duplicated(None);
    assert_eq!(catalog.len(), 4);
    assert!(catalog.duplicated().is_empty());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_csv_round_trip_through_disk() {
    let root = scene_tree("csv");
    let logger = Logger::new("integration_test.log").unwrap();

    let catalog = build_catalog(&root, &logger);
    let catalog = label_regions(&catalog);

    let csv_path = root.join("catalog.csv");
    export_csv(&catalog, &csv_path).unwrap();
    let restored = import_csv(&csv_path).unwrap();

    assert_eq!(restored.len(), catalog.len());
    for (a, b) in catalog.iter().zip(restored.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.sensor, b.sensor);
        assert_eq!(a.region, b.region);
        for (v, w) in a.footprint.vertices().iter().zip(b.footprint.vertices()) {
            assert!(v.approx_eq(w, 1e-9));
        }
    }

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_split_is_stable_across_runs() {
    let root = scene_tree("split");
    let logger = Logger::new("integration_test.log").unwrap();

    let catalog = build_catalog(&root, &logger);
    let catalog = label_regions(&catalog);

    let first = train_test_split(&catalog, 0.5).unwrap();
    let second = train_test_split(&catalog, 0.5).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.train.len() + first.test.len(), catalog.len());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_move_duplicated_keeps_one_copy_in_place() {
    let root = std::env::temp_dir()
        .join("scenekit_it")
        .join(format!("quarantine_{}", std::process::id()));
    fs::remove_dir_all(&root).ok();

    let scenes = root.join("scenes");
    // Three scenes sharing a name, in directories that also share a name
    write_scene(&scenes.join("r1/scene_x"), "scene_x", false);
    write_scene(&scenes.join("r2/scene_x"), "scene_x", false);
    write_scene(&scenes.join("r3/scene_x"), "scene_x", false);
    write_scene(&scenes.join("r1/scene_y"), "scene_y", false);

    let logger = Logger::new("integration_test.log").unwrap();
    let catalog = build_catalog(&root, &logger);
    assert_eq!(catalog.len(), 4);

    let quarantine = root.join("quarantine");
    let executor = TransferExecutor::new(&logger);
    let report = executor.move_duplicated_to(&catalog, &quarantine).unwrap();

    assert!(report.failed.is_empty());
    assert_eq!(report.transferred, 2);

    // Exactly one scene_x survives in the source tree
    let remaining: Vec<PathBuf> = walkdir::WalkDir::new(&scenes)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_str() == Some("scene_x.tif"))
        .map(|e| e.into_path())
        .collect();
    assert_eq!(remaining.len(), 1);

    // The unique-name scene is untouched
    assert!(scenes.join("r1/scene_y/scene_y.tif").exists());

    // Both repeats landed in quarantine despite the shared directory name
    let quarantined: Vec<PathBuf> = walkdir::WalkDir::new(&quarantine)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_str() == Some("scene_x.tif"))
        .map(|e| e.into_path())
        .collect();
    assert_eq!(quarantined.len(), 2);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn test_partition_transfer_is_idempotent() {
    let root = scene_tree("transfer");
    let logger = Logger::new("integration_test.log").unwrap();

    let catalog = build_catalog(&root, &logger);
    let catalog = label_regions(&catalog);

    let plan = split_into_n(&catalog, 2).unwrap();
    let destinations = vec![root.join("out/0"), root.join("out/1")];

    let executor = TransferExecutor::new(&logger);
    let report = executor.distribute(&plan, &destinations).unwrap();
    assert!(report.failed.is_empty());
    assert!(report.transferred > 0);
    assert_eq!(report.skipped, 0);

    // Destination layout preserves the anchor-relative path
    let copied: Vec<PathBuf> = walkdir::WalkDir::new(root.join("out"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    assert!(!copied.is_empty());
    assert!(copied
        .iter()
        .all(|p| p.to_string_lossy().contains("scenes")));

    // Second run finds every destination already present
    let again = executor.distribute(&plan, &destinations).unwrap();
    assert_eq!(again.transferred, 0);
    assert_eq!(again.skipped, report.transferred);

    fs::remove_dir_all(&root).ok();
}
