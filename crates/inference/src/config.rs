use preprocess::{DEFAULT_INPUT_SIZE, TensorLayout};
use serde::Deserialize;

pub const DEFAULT_MODEL_URL: &str =
    "https://github.com/DedeUlfah/Food_classifier_streamlit/raw/main/model_food.onnx";

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// HTTP(S) URL, `file://` URL or plain path of the ONNX model
    pub url: String,
    /// Optional hex sha256 pin for the downloaded bytes
    #[serde(default)]
    pub sha256: Option<String>,
    pub input_width: u32,
    pub input_height: u32,
    #[serde(default)]
    pub layout: TensorLayout,
    pub intra_threads: usize,
}

impl ModelConfig {
    pub fn input_size(&self) -> (u32, u32) {
        (self.input_width, self.input_height)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MODEL_URL.to_string(),
            sha256: None,
            input_width: DEFAULT_INPUT_SIZE.0,
            input_height: DEFAULT_INPUT_SIZE.1,
            layout: TensorLayout::Nhwc,
            intra_threads: 4,
        }
    }
}
