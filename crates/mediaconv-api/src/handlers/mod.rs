pub mod audio_convert;
pub mod health;
pub mod image_convert;
pub mod image_convert_url;
