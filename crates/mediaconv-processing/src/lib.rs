//! Media processing for the conversion service
//!
//! Upload validation, the still-image codec adapter and the ffmpeg-backed
//! audio transcoder. Nothing here knows about HTTP.

pub mod audio;
pub mod error;
pub mod image;
pub mod traits;
pub mod validator;

pub use audio::{AudioConverter, FfmpegTranscoder};
pub use error::ConversionError;
pub use self::image::ImageConverter;
pub use traits::{AudioTranscoder, ImageCodec};
pub use validator::{MediaValidator, ValidationError};
