use crate::models::format::{AudioFormat, ImageFormat, QualityPreset};
use crate::AppError;
use bytes::Bytes;
use std::path::Path;

/// Validated input for a still-image conversion
#[derive(Debug, Clone)]
pub struct ImageConversionRequest {
    pub data: Bytes,
    pub target: ImageFormat,
    pub quality: QualityPreset,
    /// Stem used for the suggested output filename (upload name or URL basename)
    pub filename_stem: Option<String>,
}

impl ImageConversionRequest {
    pub fn suggested_filename(&self) -> Option<String> {
        self.filename_stem
            .as_deref()
            .map(|stem| format!("{}.{}", stem, self.target.token()))
    }
}

/// Validated input for an audio transcode.
///
/// Construction enforces: source is a supported input, target is a supported output,
/// and the two differ.
#[derive(Debug, Clone)]
pub struct AudioConversionRequest {
    data: Bytes,
    source: AudioFormat,
    target: AudioFormat,
    filename_stem: String,
}

impl AudioConversionRequest {
    pub fn new(
        data: Bytes,
        original_filename: &str,
        target: &str,
    ) -> Result<Self, AppError> {
        let source = AudioFormat::from_filename(original_filename).ok_or_else(|| {
            AppError::InvalidInput(
                "Invalid source format. Supported formats: mp3, ogg, oga, m4a".to_string(),
            )
        })?;
        let target = AudioFormat::parse_target(target)?;

        if source == target {
            return Err(AppError::InvalidInput(
                "Source and target formats are the same".to_string(),
            ));
        }

        Ok(Self {
            data,
            source,
            target,
            filename_stem: file_stem(original_filename).unwrap_or_else(|| "audio".to_string()),
        })
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn source(&self) -> AudioFormat {
        self.source
    }

    pub fn target(&self) -> AudioFormat {
        self.target
    }

    pub fn suggested_filename(&self) -> String {
        format!("{}.{}", self.filename_stem, self.target.extension())
    }
}

/// Encoded output of a conversion
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub bytes: Bytes,
    pub content_type: &'static str,
    pub suggested_filename: Option<String>,
}

/// Base name of a path or URL segment without its extension.
///
/// Returns `None` when nothing usable remains (empty name, or only an extension).
pub fn file_stem(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    Path::new(base)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with('.'))
        .map(str::to_string)
}
