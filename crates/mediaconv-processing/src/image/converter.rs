//! Image codec adapter: decode anything `image` can read, re-encode to jpeg/png/webp

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageReader};
use mediaconv_core::{ImageFormat, QualityPreset};

use crate::error::ConversionError;
use crate::traits::ImageCodec;

/// libwebp refuses dimensions above this
const WEBP_MAX_DIMENSION: u32 = 16383;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageConverter;

impl ImageConverter {
    pub fn new() -> Self {
        Self
    }

    fn decode(data: &[u8]) -> Result<DynamicImage, ConversionError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ConversionError::Decode(e.to_string()))?;
        if reader.format().is_none() {
            return Err(ConversionError::Decode(
                "unrecognized image format".to_string(),
            ));
        }
        reader
            .decode()
            .map_err(|e| ConversionError::Decode(e.to_string()))
    }

    /// Encode to JPEG with mozjpeg (progressive, optimized Huffman tables)
    fn encode_jpeg(img: &DynamicImage, quality: QualityPreset) -> Result<Bytes, ConversionError> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality.jpeg_quality() as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp
            .start_compress(Vec::new())
            .map_err(|e| ConversionError::Encode(e.to_string()))?;
        comp.write_scanlines(&rgb_img)
            .map_err(|e| ConversionError::Encode(e.to_string()))?;
        let jpeg_data = comp
            .finish()
            .map_err(|e| ConversionError::Encode(e.to_string()))?;

        Ok(Bytes::from(jpeg_data))
    }

    fn encode_png(img: &DynamicImage) -> Result<Bytes, ConversionError> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .map_err(|e| ConversionError::Encode(e.to_string()))?;
        Ok(Bytes::from(buffer))
    }

    fn encode_webp(img: &DynamicImage, quality: QualityPreset) -> Result<Bytes, ConversionError> {
        let (width, height) = img.dimensions();
        if width > WEBP_MAX_DIMENSION || height > WEBP_MAX_DIMENSION {
            return Err(ConversionError::Encode(format!(
                "{}x{} exceeds the WebP limit of {} pixels per side",
                width, height, WEBP_MAX_DIMENSION
            )));
        }

        let rgba_img = img.to_rgba8();
        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality.webp_quality());

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}

impl ImageCodec for ImageConverter {
    fn convert(
        &self,
        data: &[u8],
        target: ImageFormat,
        quality: QualityPreset,
    ) -> Result<Bytes, ConversionError> {
        let img = Self::decode(data)?;

        tracing::debug!(
            width = img.width(),
            height = img.height(),
            target = target.codec_name(),
            quality = ?quality,
            "Encoding image"
        );

        match target {
            ImageFormat::Jpeg => Self::encode_jpeg(&img, quality),
            ImageFormat::Png => Self::encode_png(&img),
            ImageFormat::WebP => Self::encode_webp(&img, quality),
        }
    }
}
