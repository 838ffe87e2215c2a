use crate::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Target format for image conversions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[serde(rename = "jpg")]
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::WebP, ImageFormat::Png];

    /// Parse a request token (case-insensitive). Only `jpg`, `webp` and `png` are accepted.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim().to_lowercase().as_str() {
            "jpg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            "webp" => Ok(ImageFormat::WebP),
            _ => Err(AppError::InvalidInput(
                "Invalid target format. Supported formats: jpg, webp, png".to_string(),
            )),
        }
    }

    /// Token as it appears in requests and file extensions
    pub fn token(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
        }
    }

    /// Canonical codec identifier (`jpg` normalizes to `jpeg`)
    pub fn codec_name(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Audio container/codec format, inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Ogg,
    Oga,
    M4a,
}

impl AudioFormat {
    pub const TARGETS: [AudioFormat; 3] = [AudioFormat::Mp3, AudioFormat::Ogg, AudioFormat::Oga];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "ogg" => Some(AudioFormat::Ogg),
            "oga" => Some(AudioFormat::Oga),
            "m4a" => Some(AudioFormat::M4a),
            _ => None,
        }
    }

    /// Source format from a filename's extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::parse)
    }

    /// Parse a requested target format; `m4a` is input-only.
    pub fn parse_target(s: &str) -> Result<Self, AppError> {
        match Self::parse(s) {
            Some(format) if format.is_target() => Ok(format),
            _ => Err(AppError::InvalidInput(
                "Invalid target format. Supported formats: mp3, ogg, oga".to_string(),
            )),
        }
    }

    pub fn is_target(self) -> bool {
        Self::TARGETS.contains(&self)
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Oga => "oga",
            AudioFormat::M4a => "m4a",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Ogg | AudioFormat::Oga => "audio/ogg",
            AudioFormat::M4a => "audio/mp4",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Quality presets for lossy image encoders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    #[default]
    Normal, // Default quality, balanced size and quality
    Better,   // Higher quality, ≈125% file size
    Best,     // Near pristine quality, ≈170% file size
    Lighter,  // Smaller files, ≈80% file size
    Lightest, // Maximum compression, ≈50% file size
}

impl QualityPreset {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(QualityPreset::Normal),
            "better" => Ok(QualityPreset::Better),
            "best" => Ok(QualityPreset::Best),
            "lighter" => Ok(QualityPreset::Lighter),
            "lightest" => Ok(QualityPreset::Lightest),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid quality preset: {}. Supported presets: normal, better, best, lighter, lightest",
                s
            ))),
        }
    }

    /// Get quality value for JPEG (0-100)
    pub fn jpeg_quality(self) -> u8 {
        match self {
            QualityPreset::Normal => 75,
            QualityPreset::Better => 85,
            QualityPreset::Best => 95,
            QualityPreset::Lighter => 65,
            QualityPreset::Lightest => 50,
        }
    }

    /// Get quality value for WebP (0-100)
    pub fn webp_quality(self) -> f32 {
        match self {
            QualityPreset::Normal => 80.0,
            QualityPreset::Better => 90.0,
            QualityPreset::Best => 98.0,
            QualityPreset::Lighter => 70.0,
            QualityPreset::Lightest => 55.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_parse() {
        assert_eq!(ImageFormat::parse("jpg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::parse("PNG").unwrap(), ImageFormat::Png);
        assert_eq!(ImageFormat::parse(" WebP ").unwrap(), ImageFormat::WebP);
        assert!(ImageFormat::parse("gif").is_err());
        assert!(ImageFormat::parse("").is_err());
    }

    #[test]
    fn test_image_format_jpg_normalizes_to_jpeg() {
        assert_eq!(ImageFormat::Jpeg.token(), "jpg");
        assert_eq!(ImageFormat::Jpeg.codec_name(), "jpeg");
    }

    #[test]
    fn test_image_format_to_mime_type() {
        assert_eq!(ImageFormat::Jpeg.to_mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.to_mime_type(), "image/png");
        assert_eq!(ImageFormat::WebP.to_mime_type(), "image/webp");
    }

    #[test]
    fn test_audio_format_from_filename() {
        assert_eq!(AudioFormat::from_filename("input.mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_filename("a.b.OGA"), Some(AudioFormat::Oga));
        assert_eq!(AudioFormat::from_filename("voice.m4a"), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_filename("song.wav"), None);
        assert_eq!(AudioFormat::from_filename("noextension"), None);
    }

    #[test]
    fn test_audio_m4a_is_input_only() {
        assert!(AudioFormat::parse_target("m4a").is_err());
        assert_eq!(AudioFormat::parse_target("OGG").unwrap(), AudioFormat::Ogg);
        assert_eq!(AudioFormat::parse("m4a"), Some(AudioFormat::M4a));
        assert!(!AudioFormat::M4a.is_target());
    }

    #[test]
    fn test_audio_format_to_mime_type() {
        assert_eq!(AudioFormat::Mp3.to_mime_type(), "audio/mpeg");
        assert_eq!(AudioFormat::Ogg.to_mime_type(), "audio/ogg");
        assert_eq!(AudioFormat::Oga.to_mime_type(), "audio/ogg");
    }

    #[test]
    fn test_quality_preset_parse() {
        assert_eq!(QualityPreset::parse("normal").unwrap(), QualityPreset::Normal);
        assert_eq!(QualityPreset::parse("BEST").unwrap(), QualityPreset::Best);
        assert!(QualityPreset::parse("ultra").is_err());
    }

    #[test]
    fn test_quality_values() {
        assert_eq!(QualityPreset::Normal.jpeg_quality(), 75);
        assert_eq!(QualityPreset::Lightest.jpeg_quality(), 50);
        assert_eq!(QualityPreset::Better.webp_quality(), 90.0);
    }
}
