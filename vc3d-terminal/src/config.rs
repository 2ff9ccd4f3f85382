//! Viewer configuration.
//!
//! Values come from built-in defaults, then an optional JSON file, then
//! command-line flags, each layer overriding the one before.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use vc3d_core::{parse_hex_color, Material, NormalizeConfig, DEFAULT_TARGET_SIZE, DEFAULT_THRESHOLD_DEG};

use crate::renderer::RenderMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub target_size: f32,
    pub render_mode: RenderMode,
    /// Frame rate cap of the viewer loop
    pub fps: u32,
    pub auto_rotate: bool,
    /// Dihedral angle above which an edge is drawn in edge mode
    pub edge_threshold_deg: f32,
    /// Hex color for meshes loaded without a material
    pub default_color: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            render_mode: RenderMode::Faces,
            fps: 30,
            auto_rotate: true,
            edge_threshold_deg: DEFAULT_THRESHOLD_DEG,
            default_color: "#c8d4e8".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file when given, otherwise use the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Apply command-line overrides
    pub fn merge(mut self, mode: Option<RenderMode>, target_size: Option<f32>) -> Result<Self> {
        if let Some(mode) = mode {
            self.render_mode = mode;
        }
        if let Some(target_size) = target_size {
            self.target_size = target_size;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.target_size.is_finite() && self.target_size > 0.0) {
            bail!("target_size must be a positive number, got {}", self.target_size);
        }
        if self.fps == 0 {
            bail!("fps must be at least 1");
        }
        if parse_hex_color(&self.default_color).is_none() {
            bail!("default_color '{}' is not a #rrggbb color", self.default_color);
        }
        Ok(())
    }

    pub fn normalize_config(&self) -> Result<NormalizeConfig> {
        let color = parse_hex_color(&self.default_color)
            .with_context(|| format!("default_color '{}' is not a #rrggbb color", self.default_color))?;

        Ok(NormalizeConfig {
            target_size: self.target_size,
            default_material: Material::new(color),
            ..NormalizeConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());

        let normalize = config.normalize_config().unwrap();
        assert!((normalize.target_size - 2.6).abs() < 1e-6);
        assert_eq!(normalize.default_material.color, Material::default().color);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{"render_mode": "edges", "fps": 60}"#).unwrap();
        assert_eq!(config.render_mode, RenderMode::Edges);
        assert_eq!(config.fps, 60);
        assert!(config.auto_rotate);
        assert_eq!(config.default_color, "#c8d4e8");
    }

    #[test]
    fn test_cli_overrides_file() {
        let config = ViewerConfig::from_json(r#"{"target_size": 4.0, "render_mode": "vertices"}"#)
            .unwrap()
            .merge(Some(RenderMode::Faces), None)
            .unwrap();
        assert_eq!(config.render_mode, RenderMode::Faces);
        assert_eq!(config.target_size, 4.0);

        let config = config.merge(None, Some(1.5)).unwrap();
        assert_eq!(config.target_size, 1.5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ViewerConfig::from_json(r#"{"target_size": -1.0}"#).is_err());
        assert!(ViewerConfig::from_json(r#"{"default_color": "teal"}"#).is_err());
        assert!(ViewerConfig::from_json(r##"{"colour": "#ffffff"}"##).is_err());
        assert!(ViewerConfig::default().merge(None, Some(0.0)).is_err());
    }

    #[test]
    fn test_default_color_reaches_material() {
        let config = ViewerConfig {
            default_color: "#ff0000".to_string(),
            ..ViewerConfig::default()
        };
        let normalize = config.normalize_config().unwrap();
        assert_eq!(normalize.default_material.color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::load(Some(Path::new("no/such/viewer.json"))).unwrap_err();
        assert!(err.to_string().contains("viewer.json"));
    }
}
