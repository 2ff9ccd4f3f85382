/// Surface materials attached to meshes
use serde::{Deserialize, Serialize};

/// Linear RGB color with components in `0.0..=1.0`
pub type Rgb = [f32; 3];

/// Parse a `#rrggbb` (or `rrggbb`) hex string into an [`Rgb`] color
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|value| value as f32 / 255.0)
    };

    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Physically-based material description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: Option<String>,
    pub color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Rgb,
}

impl Material {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive.iter().any(|&c| c > 0.0)
    }

    /// Perceived brightness of the base color, used for ASCII shading
    pub fn luminance(&self) -> f32 {
        0.2126 * self.color[0] + 0.7152 * self.color[1] + 0.0722 * self.color[2]
    }
}

/// Neutral, non-emissive material given to meshes loaded without one
impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            color: [200.0 / 255.0, 212.0 / 255.0, 232.0 / 255.0],
            roughness: 0.5,
            metalness: 0.15,
            emissive: [0.0, 0.0, 0.0],
        }
    }
}
