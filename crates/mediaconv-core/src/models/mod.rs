//! Domain models
//!
//! Format enums for each media kind and the transient request/result values that flow
//! through a single conversion. Nothing here outlives a request.

pub mod conversion;
pub mod format;

pub use conversion::{
    file_stem, AudioConversionRequest, ConversionResult, ImageConversionRequest,
};
pub use format::{AudioFormat, ImageFormat, QualityPreset};
