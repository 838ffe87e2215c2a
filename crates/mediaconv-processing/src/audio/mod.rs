//! Audio transcoding

mod converter;
mod ffmpeg;

pub use converter::AudioConverter;
pub use ffmpeg::FfmpegTranscoder;
