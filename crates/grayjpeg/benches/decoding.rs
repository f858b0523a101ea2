use criterion::{criterion_group, criterion_main, Criterion};
use image::codecs::jpeg::JpegEncoder;
use image::ColorType;

fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let pixels: Vec<u8> = (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x ^ y) & 0xFF) as u8))
        .collect();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, 85)
        .encode(&pixels, width, height, ColorType::L8)
        .expect("Cannot encode benchmark image");
    jpeg
}

pub fn jpeg_decoding(c: &mut Criterion) {
    c.bench_function("Grayscale JPEG Decoding", |b| {
        let jpeg = gradient_jpeg(512, 384);

        b.iter(|| grayjpeg::decode(&jpeg).expect("Failed to decode benchmark image"))
    });
}

pub fn jpeg_decoding_legacy(c: &mut Criterion) {
    c.bench_function("Grayscale JPEG Decoding (legacy IDCT)", |b| {
        let jpeg = gradient_jpeg(512, 384);
        let options =
            grayjpeg::DecodeOptions::default().with_transform(grayjpeg::TransformMode::Legacy);

        b.iter(|| {
            grayjpeg::decode_with_options(&jpeg, options).expect("Failed to decode benchmark image")
        })
    });
}

criterion_group!(benches, jpeg_decoding, jpeg_decoding_legacy);
criterion_main!(benches);
