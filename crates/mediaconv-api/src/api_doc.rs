//! OpenAPI documentation, served at `/api/openapi.json`

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "mediaconv API",
        version = "0.1.0",
        description = "On-demand image (jpg, webp, png) and audio (mp3, ogg, oga) format conversion. Files are converted in memory and returned directly; nothing is stored."
    ),
    paths(
        handlers::health::health_check,
        handlers::image_convert::convert_image,
        handlers::image_convert_url::convert_image_url,
        handlers::audio_convert::convert_audio,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthResponse,
        handlers::image_convert_url::ConvertUrlRequest,
        mediaconv_core::ImageFormat,
        mediaconv_core::AudioFormat,
        mediaconv_core::QualityPreset,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "images", description = "Still-image conversion"),
        (name = "audio", description = "Audio transcoding, one conversion at a time")
    )
)]
pub struct ApiDoc;
