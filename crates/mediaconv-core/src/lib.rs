//! Mediaconv Core Library
//!
//! This crate provides the format models, conversion request/result types, error
//! taxonomy and configuration shared by the processing and API crates.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ConverterConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AudioConversionRequest, AudioFormat, ConversionResult, ImageConversionRequest, ImageFormat,
    QualityPreset,
};
