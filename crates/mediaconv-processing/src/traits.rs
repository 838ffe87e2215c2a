//! Codec seams
//!
//! The API layer holds these as trait objects so tests can substitute
//! counting or blocking fakes for the real codecs.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use mediaconv_core::{AudioFormat, ImageFormat, QualityPreset};

use crate::error::ConversionError;

/// Still-image codec: bytes in any decodable format → bytes in `target`.
///
/// Encoding is CPU-bound and synchronous; callers run it on the blocking pool.
pub trait ImageCodec: Send + Sync {
    fn convert(
        &self,
        data: &[u8],
        target: ImageFormat,
        quality: QualityPreset,
    ) -> Result<Bytes, ConversionError>;
}

/// File-to-file audio transcoder
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        target: AudioFormat,
    ) -> Result<(), ConversionError>;
}
