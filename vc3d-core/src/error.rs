//! Error types for loading and normalizing models.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for model loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors that can occur while reading a model file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither the extension nor the label names a supported format.
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// Malformed STL data.
    #[error("invalid STL data: {0}")]
    Stl(String),

    /// The OBJ reader rejected the file.
    #[error("invalid OBJ data: {0}")]
    Obj(#[from] tobj::LoadError),

    /// The glTF reader rejected the file.
    #[error("invalid glTF data: {0}")]
    Gltf(#[from] gltf::Error),
}

impl LoadError {
    pub fn stl(details: impl Into<String>) -> Self {
        Self::Stl(details.into())
    }
}

/// Errors raised by the normalizer.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// Target size must be finite and strictly positive.
    #[error("invalid target size {0}: expected a finite value greater than zero")]
    InvalidTargetSize(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::stl("unexpected end of file");
        assert!(format!("{err}").contains("unexpected end of file"));

        let err = LoadError::UnsupportedFormat("fbx".to_string());
        assert!(format!("{err}").contains("fbx"));

        let err = NormalizeError::InvalidTargetSize(-1.0);
        assert!(format!("{err}").contains("-1"));
    }
}
