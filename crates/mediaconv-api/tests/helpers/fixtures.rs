//! Test fixtures: encoded images and stand-in audio blobs.

use std::io::Cursor;

/// Gradient PNG of the given dimensions
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });

    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("Failed to encode test PNG");
    out.into_inner()
}

/// Bytes that no image decoder accepts
pub fn garbage_bytes() -> Vec<u8> {
    b"this is definitely not an image, just some text".to_vec()
}

/// Opaque audio payload; the fake transcoders never decode it.
pub fn fake_mp3() -> Vec<u8> {
    let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec();
    data.extend(std::iter::repeat(0xFFu8).take(512));
    data
}
