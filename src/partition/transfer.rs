//! Filesystem execution of partition plans
//!
//! The executor takes the pure plans from `splitter` (or derived path sets
//! from the catalog) and performs the actual directory copies and moves.
//! Scene directories keep their layout below the anchor directory name.
//! Every transfer is best-effort: an existing destination means the scene
//! was already migrated and is skipped, and a single failed copy never
//! aborts the batch.

use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::store::Catalog;
use crate::errors::{SceneError, SceneResult};
use crate::utils::fs_utils::{anchored_suffix, copy_dir_recursive, move_dir};
use crate::utils::logger::Logger;
use crate::utils::ProgressTracker;

/// Default anchor directory name for destination layout
pub const DEFAULT_ANCHOR: &str = "scenes";

/// Outcome of a bulk transfer
#[derive(Debug, Default)]
pub struct TransferReport {
    /// Directories or files actually transferred
    pub transferred: usize,
    /// Destinations that already existed and were left alone
    pub skipped: usize,
    /// Sources that could not be transferred, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl TransferReport {
    /// Folds another report into this one
    pub fn absorb(&mut self, other: TransferReport) {
        self.transferred += other.transferred;
        self.skipped += other.skipped;
        self.failed.extend(other.failed);
    }

    /// Logs a one-line summary of the outcome
    pub fn log_summary(&self, operation: &str) {
        info!(
            "{}: {} transferred, {} skipped, {} failed",
            operation,
            self.transferred,
            self.skipped,
            self.failed.len()
        );
        for (path, reason) in &self.failed {
            warn!("  failed {}: {}", path.display(), reason);
        }
    }
}

/// Executor for bulk scene directory transfers
pub struct TransferExecutor<'a> {
    /// Anchor directory name for destination path reconstruction
    anchor: String,
    /// Move instead of copy
    move_files: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> TransferExecutor<'a> {
    /// Creates an executor that copies, anchored at `scenes`
    pub fn new(logger: &'a Logger) -> Self {
        TransferExecutor {
            anchor: DEFAULT_ANCHOR.to_string(),
            move_files: false,
            logger,
        }
    }

    /// Sets the anchor directory name
    pub fn anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Switches from copying to moving
    pub fn move_files(mut self, move_files: bool) -> Self {
        self.move_files = move_files;
        self
    }

    /// Distributes partitioned scene paths to their destination roots
    ///
    /// Partition `i` of the plan is transferred under `destinations[i]`,
    /// one scene directory at a time, preserving the anchor-relative
    /// layout. Scene files sharing a directory are transferred once.
    ///
    /// # Arguments
    /// * `plan` - Per-partition scene paths from `split_into_n`
    /// * `destinations` - One destination root per partition
    pub fn distribute(
        &self,
        plan: &[Vec<PathBuf>],
        destinations: &[PathBuf],
    ) -> SceneResult<TransferReport> {
        if plan.len() != destinations.len() {
            return Err(SceneError::GenericError(format!(
                "{} partitions but {} destinations",
                plan.len(),
                destinations.len()
            )));
        }

        let mut report = TransferReport::default();
        for (paths, destination) in plan.iter().zip(destinations) {
            fs::create_dir_all(destination)?;
            let dirs = unique_parent_dirs(paths);
            let _ = self.logger.log(&format!(
                "distributing {} scene dirs to {}",
                dirs.len(),
                destination.display()
            ));

            let progress =
                ProgressTracker::new(dirs.len() as u64, "Transferring scenes");
            for dir in dirs {
                self.transfer_dir(&dir, destination, &mut report);
                progress.increment(1);
            }
            progress.finish();
        }

        report.log_summary(if self.move_files { "move" } else { "copy" });
        Ok(report)
    }

    /// Copies every scene directory of the catalog under one destination
    pub fn copy_scenes_to(&self, catalog: &Catalog, destination: &Path) -> SceneResult<TransferReport> {
        fs::create_dir_all(destination)?;
        let paths: Vec<PathBuf> = catalog.iter().map(|r| r.path.clone()).collect();
        let dirs = unique_parent_dirs(&paths);

        let mut report = TransferReport::default();
        let progress = ProgressTracker::new(dirs.len() as u64, "Copying scenes");
        for dir in dirs {
            self.transfer_dir(&dir, destination, &mut report);
            progress.increment(1);
        }
        progress.finish();

        report.log_summary("copy scenes");
        Ok(report)
    }

    /// Quarantines the directories of repeat-occurrence scenes
    ///
    /// Only occurrences after the first of each repeated name are moved,
    /// so exactly one copy of every scene stays in the source tree.
    /// Quarantine targets keep the directory's own name, with a numeric
    /// suffix when two repeats share one.
    pub fn move_duplicated_to(
        &self,
        catalog: &Catalog,
        destination: &Path,
    ) -> SceneResult<TransferReport> {
        fs::create_dir_all(destination)?;
        let repeats = catalog.repeat_occurrences();
        let paths: Vec<PathBuf> = repeats.iter().map(|r| r.path.clone()).collect();
        let dirs = unique_parent_dirs(&paths);

        let mut report = TransferReport::default();
        for dir in dirs {
            let Some(dir_name) = dir.file_name() else {
                report
                    .failed
                    .push((dir.clone(), "directory has no name".to_string()));
                continue;
            };
            let target = quarantine_target(destination, dir_name);
            match move_dir(&dir, &target) {
                Ok(()) => report.transferred += 1,
                Err(e) => report.failed.push((dir, e.to_string())),
            }
        }

        report.log_summary("move duplicated");
        Ok(report)
    }

    /// Copies every existing sidecar annotation file into one flat directory
    pub fn copy_labels_to(&self, catalog: &Catalog, destination: &Path) -> SceneResult<TransferReport> {
        fs::create_dir_all(destination)?;

        // Label copies are independent single-file operations
        let outcomes: Vec<Option<(PathBuf, String)>> = catalog
            .records()
            .par_iter()
            .filter_map(|record| {
                let label = record.label_path();
                if !label.exists() {
                    return None;
                }
                let file_name = label.file_name()?.to_os_string();
                match fs::copy(&label, destination.join(file_name)) {
                    Ok(_) => Some(None),
                    Err(e) => Some(Some((label, e.to_string()))),
                }
            })
            .collect();

        let mut report = TransferReport::default();
        for outcome in outcomes {
            match outcome {
                None => report.transferred += 1,
                Some(failure) => report.failed.push(failure),
            }
        }

        report.log_summary("copy labels");
        Ok(report)
    }

    /// Transfers one scene directory under a destination root
    ///
    /// The destination path is the root plus the source's anchor-relative
    /// suffix. Existing destinations count as already migrated. A source
    /// without the anchor segment in its path cannot be laid out and is
    /// recorded as a failure.
    fn transfer_dir(&self, dir: &Path, destination: &Path, report: &mut TransferReport) {
        let Some(suffix) = anchored_suffix(dir, &self.anchor) else {
            warn!(
                "No '{}' anchor in {}, cannot derive destination",
                self.anchor,
                dir.display()
            );
            report.failed.push((
                dir.to_path_buf(),
                format!("anchor '{}' not in path", self.anchor),
            ));
            return;
        };

        let target = destination.join(suffix);
        if target.exists() {
            report.skipped += 1;
            return;
        }

        let result = if self.move_files {
            move_dir(dir, &target)
        } else {
            copy_dir_recursive(dir, &target)
        };
        match result {
            Ok(()) => report.transferred += 1,
            Err(e) => report.failed.push((dir.to_path_buf(), e.to_string())),
        }
    }
}

/// First free quarantine path for a directory name
///
/// Repeat occurrences often live in directories sharing one name; each
/// collision gets the next numeric suffix instead of being dropped.
fn quarantine_target(destination: &Path, dir_name: &std::ffi::OsStr) -> PathBuf {
    let base = destination.join(dir_name);
    if !base.exists() {
        return base;
    }
    let name = dir_name.to_string_lossy();
    let mut counter = 1;
    loop {
        let candidate = destination.join(format!("{}_{}", name, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Unique parent directories of the given files, in first-appearance order
fn unique_parent_dirs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut dirs = Vec::new();
    for path in paths {
        if let Some(parent) = path.parent() {
            if seen.insert(parent.to_path_buf()) {
                dirs.push(parent.to_path_buf());
            }
        }
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarantine_target_suffixes_colliding_names() {
        let destination = std::env::temp_dir()
            .join("scenekit_quarantine_target")
            .join(std::process::id().to_string());
        fs::remove_dir_all(&destination).ok();
        fs::create_dir_all(&destination).unwrap();

        let name = std::ffi::OsStr::new("scene_x");
        let first = quarantine_target(&destination, name);
        assert_eq!(first, destination.join("scene_x"));

        fs::create_dir_all(&first).unwrap();
        let second = quarantine_target(&destination, name);
        assert_eq!(second, destination.join("scene_x_1"));

        fs::create_dir_all(&second).unwrap();
        let third = quarantine_target(&destination, name);
        assert_eq!(third, destination.join("scene_x_2"));

        fs::remove_dir_all(&destination).ok();
    }

    #[test]
    fn unique_parent_dirs_deduplicates_in_order() {
        let paths = vec![
            PathBuf::from("/scenes/a/img1.tif"),
            PathBuf::from("/scenes/a/img2.tif"),
            PathBuf::from("/scenes/b/img3.tif"),
        ];
        let dirs = unique_parent_dirs(&paths);
        assert_eq!(
            dirs,
            vec![PathBuf::from("/scenes/a"), PathBuf::from("/scenes/b")]
        );
    }
}
