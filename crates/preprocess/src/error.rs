use thiserror::Error;

/// The uploaded image cannot be turned into a model input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("Image upload is empty")]
    Empty,

    #[error("Unsupported image format: {0} (expected JPEG or PNG)")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image has zero width or height")]
    ZeroSized,

    #[error("Buffer size mismatch: expected {expected}, got {actual} bytes")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Resize failed: {0}")]
    Resize(String),
}
