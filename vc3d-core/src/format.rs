/// Supported source formats
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModelFormat {
    Obj,
    Stl,
    Gltf,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 3] = [ModelFormat::Obj, ModelFormat::Stl, ModelFormat::Gltf];

    pub fn label(self) -> &'static str {
        match self {
            ModelFormat::Obj => "OBJ",
            ModelFormat::Stl => "STL",
            ModelFormat::Gltf => "GLTF",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelFormat::Obj => "Wavefront",
            ModelFormat::Stl => "Stereolithography",
            ModelFormat::Gltf => "GL Transmission",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "obj" => Some(ModelFormat::Obj),
            "stl" => Some(ModelFormat::Stl),
            "gltf" | "glb" => Some(ModelFormat::Gltf),
            _ => None,
        }
    }

    /// Detect the format from a file name's extension
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts labels (`"OBJ"`) as well as extensions (`"glb"`)
impl FromStr for ModelFormat {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        Self::from_extension(trimmed).ok_or_else(|| LoadError::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(ModelFormat::from_path(Path::new("models/Cop.obj")).unwrap(), ModelFormat::Obj);
        assert_eq!(ModelFormat::from_path(Path::new("911.STL")).unwrap(), ModelFormat::Stl);
        assert_eq!(ModelFormat::from_path(Path::new("sol.glb")).unwrap(), ModelFormat::Gltf);
        assert!(ModelFormat::from_path(Path::new("scene.fbx")).is_err());
        assert!(ModelFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_labels_round_trip() {
        for format in ModelFormat::ALL {
            assert_eq!(format.label().parse::<ModelFormat>().unwrap(), format);
        }
        assert_eq!(".gltf".parse::<ModelFormat>().unwrap(), ModelFormat::Gltf);
        assert!("ply".parse::<ModelFormat>().is_err());
    }
}
