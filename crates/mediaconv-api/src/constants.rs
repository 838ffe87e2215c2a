//! API constants

/// Response header carrying the suggested output filename
pub const X_FILENAME: &str = "x-filename";

/// Multipart field holding the image on `/convert`
pub const IMAGE_FIELD: &str = "image";

/// Multipart field holding the audio file on `/convert-audio`
pub const AUDIO_FIELD: &str = "audio";

/// Filename stem used when the source name gives nothing usable
pub const DEFAULT_IMAGE_STEM: &str = "image";
