//! Catalog record for one discovered scene

use std::path::{Path, PathBuf};

use crate::errors::{SceneError, SceneResult};
use crate::geometry::Footprint;

/// One satellite image file plus its derived metadata
///
/// `path` is the immutable identity of the record; `name` is the logical
/// key used for duplicate detection and is allowed to repeat across paths.
/// `region` and `inferred` are never derived from the file: they arrive
/// through an imported catalog that was labeled externally, and operations
/// that need them fail with `MissingAttribute` when they were never set.
#[derive(Debug, Clone)]
pub struct SceneRecord {
    /// Resolved sensor identifier, or `UNKNOWN`
    pub sensor: String,
    /// Absolute path of the image file
    pub path: PathBuf,
    /// Base filename without extension
    pub name: String,
    /// Original file extension
    pub extension: String,
    /// Whether a sidecar annotation file exists beside the image
    pub annotated: bool,
    /// Geographic footprint polygon
    pub footprint: Footprint,
    /// Externally supplied grouping attribute
    pub region: Option<String>,
    /// Externally supplied inference flag
    pub inferred: Option<bool>,
}

impl SceneRecord {
    /// The region attribute, or `MissingAttribute` when never populated
    pub fn region(&self) -> SceneResult<&str> {
        self.region
            .as_deref()
            .ok_or(SceneError::MissingAttribute("region"))
    }

    /// The inference flag, or `MissingAttribute` when never populated
    pub fn inferred(&self) -> SceneResult<bool> {
        self.inferred.ok_or(SceneError::MissingAttribute("inferred"))
    }

    /// Directory holding the scene file
    pub fn scene_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Path of the sidecar annotation file for this scene
    pub fn label_path(&self) -> PathBuf {
        self.path.with_extension("label")
    }
}
