//! Catalog construction from directory trees
//!
//! Walks one or more root directories, filters candidate image files by
//! extension and optional stem suffix, and probes every kept file for its
//! geo-referencing. Per-file work is independent, so probing runs on the
//! rayon thread pool; files that fail to open or carry broken coordinates
//! are logged and skipped without aborting the walk.

use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::catalog::record::SceneRecord;
use crate::catalog::store::Catalog;
use crate::errors::SceneResult;
use crate::geometry::extract_footprint;
use crate::raster;
use crate::sensor::resolve_sensor;
use crate::utils::logger::Logger;
use crate::utils::ProgressTracker;

/// Default image extension allow-list
pub const DEFAULT_EXTENSIONS: &[&str] = &["jp2", "tif"];

/// One root directory to scan, with an optional stem-suffix filter
#[derive(Debug, Clone)]
pub struct ScanRoot {
    /// Directory to walk recursively
    pub dir: PathBuf,
    /// Keep only files whose stem ends with this suffix (case-insensitive)
    pub suffix: Option<String>,
}

impl ScanRoot {
    /// Creates a scan root without a suffix filter
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ScanRoot {
            dir: dir.into(),
            suffix: None,
        }
    }

    /// Creates a scan root with a stem-suffix filter
    pub fn with_suffix(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        ScanRoot {
            dir: dir.into(),
            suffix: Some(suffix.into()),
        }
    }
}

/// Builder that walks directory roots into a catalog
pub struct CatalogBuilder<'a> {
    /// Roots to scan
    roots: Vec<ScanRoot>,
    /// Lowercased extension allow-list
    extensions: Vec<String>,
    /// Whether the walk follows symbolic links
    follow_links: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> CatalogBuilder<'a> {
    /// Creates a builder with the default extension allow-list
    pub fn new(logger: &'a Logger) -> Self {
        CatalogBuilder {
            roots: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            follow_links: false,
            logger,
        }
    }

    /// Adds a root directory to scan
    pub fn root(mut self, root: ScanRoot) -> Self {
        self.roots.push(root);
        self
    }

    /// Replaces the extension allow-list (matched case-insensitively)
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Sets whether the walk follows symbolic links
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Walks all roots and assembles the catalog
    ///
    /// # Returns
    /// The merged catalog across all roots; unreadable files are skipped
    /// with a diagnostic rather than failing the build
    pub fn build(&self) -> SceneResult<Catalog> {
        let mut catalog = Catalog::new();

        for root in &self.roots {
            let paths = self.collect_paths(root);
            info!(
                "Scanning {} candidate files under {}",
                paths.len(),
                root.dir.display()
            );
            let _ = self.logger.log(&format!(
                "catalog scan: {} candidates under {}",
                paths.len(),
                root.dir.display()
            ));

            let progress = ProgressTracker::new(paths.len() as u64, "Probing scenes");
            let records: Vec<SceneRecord> = paths
                .par_iter()
                .filter_map(|path| {
                    let record = match build_record(path) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!("Skipping {}: {}", path.display(), e);
                            None
                        }
                    };
                    progress.increment(1);
                    record
                })
                .collect();
            progress.finish();

            catalog.merge(Catalog::from_records(records));
        }

        info!("Catalog built with {} scenes", catalog.len());
        Ok(catalog)
    }

    /// Enumerates the files under a root that pass the filters
    fn collect_paths(&self, root: &ScanRoot) -> Vec<PathBuf> {
        let walker = WalkDir::new(&root.dir)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(Result::ok);

        let mut paths = Vec::new();
        for entry in walker {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();

            if !self.extension_allowed(&path) {
                continue;
            }
            if let Some(suffix) = &root.suffix {
                if !stem_has_suffix(&path, suffix) {
                    debug!("Suffix filter dropped {}", path.display());
                    continue;
                }
            }
            paths.push(path);
        }
        paths
    }

    /// Checks the file extension against the allow-list
    fn extension_allowed(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        self.extensions.iter().any(|allowed| *allowed == ext)
    }
}

/// Case-insensitive check that the file stem ends with the suffix
fn stem_has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase().ends_with(&suffix.to_lowercase()))
        .unwrap_or(false)
}

/// Probes one file and assembles its catalog record
fn build_record(path: &Path) -> SceneResult<SceneRecord> {
    let info = raster::probe(path)?;
    let footprint = extract_footprint(
        info.width,
        info.height,
        &info.transform,
        info.crs.reprojection().as_ref(),
    )?;

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_string();
    let annotated = path.with_extension("label").exists();
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let sensor = resolve_sensor(&absolute.to_string_lossy());

    Ok(SceneRecord {
        sensor,
        path: absolute,
        name,
        extension,
        annotated,
        footprint,
        region: None,
        inferred: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_filter_is_case_insensitive() {
        assert!(stem_has_suffix(Path::new("/d/scene_PAN.tif"), "_pan"));
        assert!(!stem_has_suffix(Path::new("/d/scene_MS.tif"), "_pan"));
    }
}
