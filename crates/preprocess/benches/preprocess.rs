use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use preprocess::{CpuPreProcessor, TensorLayout};
use std::io::Cursor;

/// Create raw pixel buffer for benchmarking (gradient pattern)
fn create_test_pixels(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = vec![0u8; (width * height * 3) as usize];
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            pixels[idx] = (x % 256) as u8; // R
            pixels[idx + 1] = (y % 256) as u8; // G
            pixels[idx + 2] = ((x + y) % 256) as u8; // B
        }
    }
    pixels
}

/// Encode a gradient as JPEG, the common phone-camera upload
fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .unwrap();
    bytes
}

fn benchmark_cpu_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("cpu_preprocess");

    let resolutions = [(640, 480), (1280, 720), (1920, 1080), (4032, 3024)];

    for layout in [TensorLayout::Nhwc, TensorLayout::Nchw] {
        let mut preprocessor = CpuPreProcessor::with_layout((227, 227), layout);

        for (width, height) in resolutions.iter() {
            let pixels = create_test_pixels(*width, *height);

            group.bench_with_input(
                BenchmarkId::new(format!("stretch_{:?}", layout), format!("{}x{}", width, height)),
                &pixels,
                |b, pixels| {
                    b.iter(|| {
                        preprocessor
                            .preprocess_from_u8_slice(
                                black_box(pixels),
                                black_box(*width),
                                black_box(*height),
                            )
                            .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_upload_preprocess(c: &mut Criterion) {
    let mut group = c.benchmark_group("upload_preprocess");

    let resolutions = [(640, 480), (1920, 1080)];
    let mut preprocessor = CpuPreProcessor::default();

    for (width, height) in resolutions.iter() {
        let jpeg = create_test_jpeg(*width, *height);

        group.bench_with_input(
            BenchmarkId::new("decode_and_stretch", format!("{}x{}", width, height)),
            &jpeg,
            |b, jpeg| {
                b.iter(|| preprocessor.preprocess_upload(black_box(jpeg)).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_cpu_preprocess, benchmark_upload_preprocess);

criterion_main!(benches);
