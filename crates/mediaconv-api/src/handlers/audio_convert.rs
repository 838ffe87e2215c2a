use crate::constants::AUDIO_FIELD;
use crate::error::{audio_conversion_error, ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::response::converted_file_response;
use crate::utils::upload::extract_single_file;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    response::Response,
};
use mediaconv_core::{AppError, AudioConversionRequest};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertAudioQuery {
    /// Target format: mp3, ogg or oga (case-insensitive)
    pub format: Option<String>,
}

#[utoipa::path(
    post,
    path = "/convert-audio",
    tag = "audio",
    params(ConvertAudioQuery),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Single file field named `audio` (mp3, ogg, oga or m4a)"),
    responses(
        (status = 200, description = "Converted audio bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Missing file, bad or identical format", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 429, description = "Another conversion is in progress", body = ErrorResponse),
        (status = 500, description = "Transcode failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query, multipart),
    fields(
        request_id = %uuid::Uuid::new_v4(),
        format = ?query.format,
        operation = "convert_audio"
    )
)]
pub async fn convert_audio(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConvertAudioQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    const MISSING_FILE: &str = "No audio file uploaded";

    let multipart = multipart.map_err(|_| AppError::InvalidInput(MISSING_FILE.to_string()))?;
    let upload =
        extract_single_file(multipart, AUDIO_FIELD, &state.limits.audio, MISSING_FILE).await?;

    let request = AudioConversionRequest::new(
        upload.data,
        &upload.filename,
        query.format.as_deref().unwrap_or_default(),
    )?;

    // Held until this function returns or its future is dropped
    let _permit = state.conversion_guard.try_acquire()?;

    let started = Instant::now();
    let result = state
        .audio_converter
        .convert(&request)
        .await
        .map_err(audio_conversion_error)?;

    tracing::info!(
        source = %request.source(),
        target = %request.target(),
        input_size = request.data().len(),
        output_size = result.bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Audio converted"
    );

    Ok(converted_file_response(result))
}
