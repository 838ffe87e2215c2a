use crate::constants::{DEFAULT_IMAGE_STEM, IMAGE_FIELD};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::response::converted_file_response;
use crate::utils::upload::extract_single_file;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    response::Response,
};
use mediaconv_core::models::file_stem;
use mediaconv_core::{AppError, ConversionResult, ImageConversionRequest, ImageFormat, QualityPreset};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertImageQuery {
    /// Target format: jpg, webp or png (case-insensitive)
    pub format: Option<String>,
    /// Lossy quality preset: normal, better, best, lighter, lightest
    pub quality: Option<String>,
}

pub(crate) fn resolve_quality(
    requested: Option<&str>,
    default: QualityPreset,
) -> Result<QualityPreset, AppError> {
    match requested {
        Some(value) if !value.trim().is_empty() => QualityPreset::parse(value),
        _ => Ok(default),
    }
}

/// Run the image codec on the blocking pool
pub(crate) async fn run_image_conversion(
    state: &AppState,
    request: ImageConversionRequest,
) -> Result<ConversionResult, HttpAppError> {
    let codec = state.image_codec.clone();
    let started = Instant::now();
    let input_size = request.data.len();
    let suggested_filename = request.suggested_filename();

    let ImageConversionRequest {
        data,
        target,
        quality,
        ..
    } = request;

    let bytes = tokio::task::spawn_blocking(move || codec.convert(&data, target, quality))
        .await
        .map_err(|e| AppError::ImageProcessing(format!("Image encoder task failed: {}", e)))??;

    tracing::info!(
        target = target.codec_name(),
        input_size,
        output_size = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Image converted"
    );

    Ok(ConversionResult {
        bytes,
        content_type: target.to_mime_type(),
        suggested_filename,
    })
}

#[utoipa::path(
    post,
    path = "/convert",
    tag = "images",
    params(ConvertImageQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Single file field named `image`"),
    responses(
        (status = 200, description = "Converted image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Missing file, bad format or disallowed extension", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Image could not be processed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query, multipart),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        format = ?query.format,
        operation = "convert_image"
    )
)]
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertImageQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    const MISSING_FILE: &str = "No image file uploaded";

    let multipart = multipart.map_err(|_| AppError::InvalidInput(MISSING_FILE.to_string()))?;
    let upload =
        extract_single_file(multipart, IMAGE_FIELD, &state.limits.image, MISSING_FILE).await?;

    let target = ImageFormat::parse(query.format.as_deref().unwrap_or_default())?;
    let quality = resolve_quality(query.quality.as_deref(), state.config.default_image_quality())?;

    tracing::debug!(
        filename = %upload.filename,
        size = upload.data.len(),
        "Image upload accepted"
    );

    let request = ImageConversionRequest {
        filename_stem: Some(
            file_stem(&upload.filename).unwrap_or_else(|| DEFAULT_IMAGE_STEM.to_string()),
        ),
        data: upload.data,
        target,
        quality,
    };

    let result = run_image_conversion(&state, request).await?;
    Ok(converted_file_response(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_quality() {
        assert_eq!(
            resolve_quality(None, QualityPreset::Better).unwrap(),
            QualityPreset::Better
        );
        assert_eq!(
            resolve_quality(Some(""), QualityPreset::Normal).unwrap(),
            QualityPreset::Normal
        );
        assert_eq!(
            resolve_quality(Some("lightest"), QualityPreset::Normal).unwrap(),
            QualityPreset::Lightest
        );
        assert!(resolve_quality(Some("max"), QualityPreset::Normal).is_err());
    }
}
