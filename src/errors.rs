//! Custom error types for scene catalog processing

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Scene catalog error types
#[derive(Debug)]
pub enum SceneError {
    /// I/O error
    IoError(io::Error),
    /// File is not a readable raster
    InvalidRaster(PathBuf, String),
    /// Raster carries no usable geo-referencing
    MissingGeoReference(PathBuf),
    /// A transformed footprint coordinate was not finite
    GeometryError(String),
    /// A record attribute required by the operation was never populated
    MissingAttribute(&'static str),
    /// CSV serialization error
    CsvError(csv::Error),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "I/O error: {}", e),
            SceneError::InvalidRaster(path, msg) => {
                write!(f, "Cannot open raster {}: {}", path.display(), msg)
            }
            SceneError::MissingGeoReference(path) => {
                write!(f, "No geo-referencing tags in {}", path.display())
            }
            SceneError::GeometryError(msg) => write!(f, "Geometry error: {}", msg),
            SceneError::MissingAttribute(attr) => {
                write!(f, "Record attribute '{}' is not populated", attr)
            }
            SceneError::CsvError(e) => write!(f, "CSV error: {}", e),
            SceneError::GenericError(msg) => write!(f, "Scene error: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<io::Error> for SceneError {
    fn from(error: io::Error) -> Self {
        SceneError::IoError(error)
    }
}

impl From<csv::Error> for SceneError {
    fn from(error: csv::Error) -> Self {
        SceneError::CsvError(error)
    }
}

impl From<String> for SceneError {
    fn from(msg: String) -> Self {
        SceneError::GenericError(msg)
    }
}

/// Result type for scene catalog operations
pub type SceneResult<T> = Result<T, SceneError>;
