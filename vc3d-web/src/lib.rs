/// VC3D Web - WASM bindings for in-browser model analysis
///
/// Model bytes handed over from JavaScript are parsed, normalized and
/// measured; results come back as the JSON stats record.
use log::debug;
use vc3d_core::{load_model_from_slice, ModelFormat, NormalizeConfig, StatsRecord, DEFAULT_TARGET_SIZE};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebAnalyzer {
    target_size: f32,
}

#[wasm_bindgen]
impl WebAnalyzer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebAnalyzer {
        WebAnalyzer {
            target_size: DEFAULT_TARGET_SIZE,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn target_size(&self) -> f32 {
        self.target_size
    }

    #[wasm_bindgen(setter)]
    pub fn set_target_size(&mut self, target_size: f32) {
        self.target_size = target_size;
    }

    /// Analyze a model file's bytes; `format` is a label (`"STL"`) or an
    /// extension (`"glb"`). Returns the stats record as a JSON string.
    pub fn analyze(&self, data: &[u8], format: &str) -> Result<String, JsValue> {
        let stats = self.analyze_bytes(data, format).map_err(|err| JsValue::from_str(&err))?;
        serde_json::to_string(&stats).map_err(|err| JsValue::from_str(&err.to_string()))
    }
}

impl WebAnalyzer {
    fn analyze_bytes(&self, data: &[u8], format: &str) -> Result<StatsRecord, String> {
        let format: ModelFormat = format.parse().map_err(|err: vc3d_core::LoadError| err.to_string())?;
        let mut model = load_model_from_slice(data, format, "upload").map_err(|err| err.to_string())?;

        let normalization = model
            .normalize(&NormalizeConfig::with_target_size(self.target_size))
            .map_err(|err| err.to_string())?;
        debug!("normalized upload with scale {}", normalization.uniform_scale());

        Ok(model.stats())
    }
}

impl Default for WebAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
