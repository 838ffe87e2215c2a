//! Still-image conversion

mod converter;

pub use converter::ImageConverter;
