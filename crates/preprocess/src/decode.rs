use crate::error::ImageError;
use common::span;
use image::{ImageFormat, RgbImage};

/// Decode a JPEG or PNG upload into packed 8-bit RGB.
///
/// Grayscale, alpha and 16-bit images are coerced to three 8-bit channels;
/// alpha is dropped.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, ImageError> {
    let _s = span!("decode_image");

    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    let format = image::guess_format(bytes)
        .map_err(|_| ImageError::UnsupportedFormat("unrecognized".to_string()))?;

    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(ImageError::UnsupportedFormat(format!("{:?}", format)));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::Decode(e.to_string()))?;

    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(ImageError::ZeroSized);
    }

    tracing::trace!(
        width = decoded.width(),
        height = decoded.height(),
        color = ?decoded.color(),
        format = ?format,
        "Decoded upload"
    );

    Ok(decoded.to_rgb8())
}
