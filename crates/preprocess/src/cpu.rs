use crate::config::{DEFAULT_INPUT_SIZE, TensorLayout};
use crate::decode::decode_image;
use crate::error::ImageError;
use common::{span, span_debug};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
    images::{Image, ImageRef},
};
use ndarray::{Array, IxDyn};
use std::default::Default;

pub struct CpuPreProcessor {
    pub input_size: (u32, u32),
    pub layout: TensorLayout,
    resizer: Resizer,
}

impl CpuPreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self::with_layout(input_size, TensorLayout::default())
    }

    pub fn with_layout(input_size: (u32, u32), layout: TensorLayout) -> Self {
        Self {
            input_size,
            layout,
            resizer: Resizer::new(),
        }
    }

    /// Decode an uploaded JPEG/PNG and turn it into a model input tensor.
    pub fn preprocess_upload(&mut self, bytes: &[u8]) -> Result<Array<f32, IxDyn>, ImageError> {
        let rgb = decode_image(bytes)?;
        let (width, height) = rgb.dimensions();
        self.preprocess_from_u8_slice(rgb.as_raw(), width, height)
    }

    pub fn preprocess_from_u8_slice(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Array<f32, IxDyn>, ImageError> {
        let _s = span!("preprocess_image");

        tracing::trace!(
            width,
            height,
            pixel_bytes = pixels.len(),
            "Preprocessing image dimensions"
        );

        if width == 0 || height == 0 {
            return Err(ImageError::ZeroSized);
        }

        let expected_size = width as usize * height as usize * 3;
        if pixels.len() != expected_size {
            return Err(ImageError::SizeMismatch {
                expected: expected_size,
                actual: pixels.len(),
            });
        }

        if (width, height) == self.input_size {
            return self.normalize(pixels);
        }

        let resized = self.stretch(pixels, width, height)?;
        self.normalize(resized.buffer())
    }

    /// Resize straight to the input size. Aspect ratio is not preserved.
    fn stretch(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Image<'static>, ImageError> {
        let _s = span!("stretch_resize");

        let src = ImageRef::new(width, height, pixels, PixelType::U8x3)
            .map_err(|e| ImageError::Resize(e.to_string()))?;

        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        self.resizer
            .resize(
                &src,
                &mut resized,
                &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            )
            .map_err(|e| ImageError::Resize(e.to_string()))?;

        Ok(resized)
    }

    /// Scale `[0, 255]` to `[0, 1]` and add the batch dimension.
    fn normalize(&self, buf: &[u8]) -> Result<Array<f32, IxDyn>, ImageError> {
        let _s = span_debug!("normalize");

        let width = self.input_size.0 as usize;
        let height = self.input_size.1 as usize;
        let spatial = width * height;

        let output: Vec<f32> = match self.layout {
            TensorLayout::Nhwc => buf.iter().map(|&v| v as f32 / 255.0).collect(),
            TensorLayout::Nchw => {
                let mut planar = vec![0.0f32; 3 * spatial];
                for (i, px) in buf.chunks_exact(3).enumerate() {
                    planar[i] = px[0] as f32 / 255.0;
                    planar[i + spatial] = px[1] as f32 / 255.0;
                    planar[i + 2 * spatial] = px[2] as f32 / 255.0;
                }
                planar
            }
        };

        let actual = output.len();
        Array::from_shape_vec(IxDyn(&self.layout.shape(width, height)), output).map_err(|_| {
            ImageError::SizeMismatch {
                expected: 3 * spatial,
                actual,
            }
        })
    }
}

impl Default for CpuPreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let mut pixels = vec![0u8; (width * height * 3) as usize];
        for y in 0..height {
            for x in 0..width {
                let idx = ((y * width + x) * 3) as usize;
                pixels[idx] = (x % 256) as u8;
                pixels[idx + 1] = (y % 256) as u8;
                pixels[idx + 2] = ((x + y) % 256) as u8;
            }
        }
        pixels
    }

    /// Test stretch resize ignores aspect ratio
    #[test]
    fn test_stretch_to_input_size() {
        // 800x600 image (4:3 aspect ratio)
        let pixels = vec![128u8; 800 * 600 * 3];

        let mut preprocessor = CpuPreProcessor::default();
        let output = preprocessor.preprocess_from_u8_slice(&pixels, 800, 600).unwrap();

        assert_eq!(output.shape(), &[1, 227, 227, 3]);

        // No letterbox padding: every corner carries image content
        let expected = 128.0 / 255.0;
        for (y, x) in [(0, 0), (0, 226), (226, 0), (226, 226), (113, 113)] {
            for c in 0..3 {
                let v = output[[0, y, x, c]];
                assert!(
                    (v - expected).abs() < 1.5 / 255.0,
                    "Pixel ({}, {}) channel {} should stay mid gray (got {})",
                    x,
                    y,
                    c,
                    v
                );
            }
        }
    }

    /// Test values are scaled to [0, 1] without mean/std normalization
    #[test]
    fn test_unit_range_normalization() {
        let mut pixels = Vec::with_capacity(227 * 227 * 3);
        for _ in 0..227 * 227 {
            pixels.extend_from_slice(&[255, 0, 51]);
        }

        let mut preprocessor = CpuPreProcessor::default();
        let output = preprocessor.preprocess_from_u8_slice(&pixels, 227, 227).unwrap();

        assert_eq!(output[[0, 10, 20, 0]], 1.0);
        assert_eq!(output[[0, 10, 20, 1]], 0.0);
        assert!((output[[0, 10, 20, 2]] - 0.2).abs() < 1e-6);
        assert!(output.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    /// Re-applying the resize to an image already at input size is a no-op
    #[test]
    fn test_resize_is_idempotent_at_input_size() {
        let pixels = gradient(227, 227);

        let mut preprocessor = CpuPreProcessor::default();
        let output = preprocessor.preprocess_from_u8_slice(&pixels, 227, 227).unwrap();

        let direct: Vec<f32> = pixels.iter().map(|&v| v as f32 / 255.0).collect();
        assert_eq!(output.as_slice().unwrap(), direct.as_slice());
    }

    /// Test NCHW layout keeps channels planar
    #[test]
    fn test_nchw_layout() {
        let mut pixels = Vec::with_capacity(227 * 227 * 3);
        for _ in 0..227 * 227 {
            pixels.extend_from_slice(&[255, 0, 0]);
        }

        let mut preprocessor = CpuPreProcessor::with_layout(DEFAULT_INPUT_SIZE, TensorLayout::Nchw);
        let output = preprocessor.preprocess_from_u8_slice(&pixels, 227, 227).unwrap();

        assert_eq!(output.shape(), &[1, 3, 227, 227]);
        assert_eq!(output[[0, 0, 100, 100]], 1.0);
        assert_eq!(output[[0, 1, 100, 100]], 0.0);
        assert_eq!(output[[0, 2, 100, 100]], 0.0);
    }

    /// Test buffer size mismatch detection
    #[test]
    fn test_buffer_size_mismatch_detection() {
        let pixels = vec![0u8; 200]; // Wrong size for 10x10

        let mut preprocessor = CpuPreProcessor::default();
        let result = preprocessor.preprocess_from_u8_slice(&pixels, 10, 10);

        assert_eq!(
            result.unwrap_err(),
            ImageError::SizeMismatch {
                expected: 300,
                actual: 200
            }
        );
    }

    #[test]
    fn test_upload_is_deterministic() {
        let image = RgbImage::from_fn(300, 200, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 77]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let mut preprocessor = CpuPreProcessor::default();
        let first = preprocessor.preprocess_upload(&bytes).unwrap();
        let second = preprocessor.preprocess_upload(&bytes).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.shape(), &[1, 227, 227, 3]);
    }
}
