//! Filesystem helpers for bulk scene transfers

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// Returns the path suffix starting at the rightmost component named `anchor`.
///
/// Scene trees keep their on-disk layout below a well-known directory
/// (usually `scenes`); transfers reproduce that layout under the destination
/// root. Returns `None` when the anchor never appears in the path.
///
/// # Arguments
/// * `path` - Source path to search
/// * `anchor` - Directory name to anchor the suffix at
pub fn anchored_suffix(path: &Path, anchor: &str) -> Option<PathBuf> {
    let components: Vec<Component> = path.components().collect();
    let anchor_idx = components
        .iter()
        .rposition(|c| matches!(c, Component::Normal(name) if name.to_str() == Some(anchor)))?;

    let mut suffix = PathBuf::new();
    for component in &components[anchor_idx..] {
        suffix.push(component.as_os_str());
    }
    Some(suffix)
}

/// Recursively copies a directory tree
///
/// # Arguments
/// * `src` - Source directory
/// * `dst` - Destination directory (created if absent)
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            io::Error::new(io::ErrorKind::Other, format!("walk failed: {}", e))
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Moves a directory tree, falling back to copy+remove across filesystems
///
/// # Arguments
/// * `src` - Source directory
/// * `dst` - Destination directory
pub fn move_dir(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        // EXDEV and friends: rename cannot cross mount points
        Err(_) => {
            copy_dir_recursive(src, dst)?;
            fs::remove_dir_all(src)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_suffix_finds_rightmost_anchor() {
        let path = Path::new("/data/scenes/old/scenes/region_a/WV3/img001");
        let suffix = anchored_suffix(path, "scenes").unwrap();
        assert_eq!(suffix, PathBuf::from("scenes/region_a/WV3/img001"));
    }

    #[test]
    fn anchored_suffix_missing_anchor() {
        let path = Path::new("/data/other/region_a/img001");
        assert!(anchored_suffix(path, "scenes").is_none());
    }
}
