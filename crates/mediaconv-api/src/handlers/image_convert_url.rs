use crate::constants::DEFAULT_IMAGE_STEM;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::image_convert::{resolve_quality, run_image_conversion};
use crate::state::AppState;
use crate::utils::extract::JsonOrForm;
use crate::utils::response::converted_file_response;
use axum::{extract::State, response::Response};
use mediaconv_core::{AppError, ImageConversionRequest, ImageFormat};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertUrlRequest {
    /// http(s) URL of the source image
    pub url: Option<String>,
    /// Target format: jpg, webp or png (case-insensitive)
    pub format: Option<String>,
    /// Lossy quality preset
    pub quality: Option<String>,
}

#[utoipa::path(
    post,
    path = "/convert-url",
    tag = "images",
    request_body(content = ConvertUrlRequest, description = "JSON or urlencoded form"),
    responses(
        (status = 200, description = "Converted image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Missing URL, bad format or fetch failure", body = ErrorResponse),
        (status = 500, description = "Image could not be processed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, body),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        url = ?body.url,
        format = ?body.format,
        operation = "convert_image_url"
    )
)]
pub async fn convert_image_url(
    State(state): State<Arc<AppState>>,
    JsonOrForm(body): JsonOrForm<ConvertUrlRequest>,
) -> Result<Response, HttpAppError> {
    let url = body
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::InvalidInput("No image URL provided".to_string()))?;

    let target = ImageFormat::parse(body.format.as_deref().unwrap_or_default())?;
    let quality = resolve_quality(body.quality.as_deref(), state.config.default_image_quality())?;

    let fetched = state.fetcher.fetch(url).await?;

    tracing::debug!(size = fetched.data.len(), "Remote image downloaded");

    let request = ImageConversionRequest {
        data: fetched.data,
        target,
        quality,
        filename_stem: Some(
            fetched
                .filename_stem
                .unwrap_or_else(|| DEFAULT_IMAGE_STEM.to_string()),
        ),
    };

    let result = run_image_conversion(&state, request).await?;
    Ok(converted_file_response(result))
}
