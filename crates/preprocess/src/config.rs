use serde::Deserialize;

/// Spatial size the food classifier was trained at (width, height).
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (227, 227);

/// Memory layout of the model input tensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `[1, H, W, 3]`, the Keras channel-last default
    #[default]
    Nhwc,
    /// `[1, 3, H, W]`
    Nchw,
}

impl TensorLayout {
    pub fn shape(&self, width: usize, height: usize) -> [usize; 4] {
        match self {
            TensorLayout::Nhwc => [1, height, width, 3],
            TensorLayout::Nchw => [1, 3, height, width],
        }
    }
}
