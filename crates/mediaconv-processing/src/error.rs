use std::io;

/// Failures inside a codec adapter
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Failed to decode input: {0}")]
    Decode(String),

    #[error("Failed to encode output: {0}")]
    Encode(String),

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("IO error during conversion: {0}")]
    Io(#[from] io::Error),
}
