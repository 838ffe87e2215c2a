//! Application state shared by all handlers

use std::sync::Arc;

use mediaconv_core::Config;
use mediaconv_processing::{AudioConverter, AudioTranscoder, ImageCodec, MediaValidator};

use crate::services::{ConversionGuard, RemoteFetcher};

/// Validators for each upload endpoint
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub image: MediaValidator,
    pub audio: MediaValidator,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            image: MediaValidator::new(
                config.max_image_size_bytes(),
                config.image_allowed_extensions().to_vec(),
            ),
            audio: MediaValidator::new(
                config.max_audio_size_bytes(),
                config.audio_allowed_extensions().to_vec(),
            ),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub limits: UploadLimits,
    pub image_codec: Arc<dyn ImageCodec>,
    pub audio_converter: AudioConverter,
    pub fetcher: Arc<dyn RemoteFetcher>,
    pub conversion_guard: ConversionGuard,
}

impl AppState {
    pub fn new(
        config: Config,
        image_codec: Arc<dyn ImageCodec>,
        transcoder: Arc<dyn AudioTranscoder>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        let limits = UploadLimits::from_config(&config);
        let audio_converter = AudioConverter::new(transcoder, config.conversion_temp_dir());
        Self {
            config,
            limits,
            image_codec,
            audio_converter,
            fetcher,
            conversion_guard: ConversionGuard::new(),
        }
    }
}
