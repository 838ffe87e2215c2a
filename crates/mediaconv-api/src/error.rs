//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Domain errors convert into it via
//! `From`, and it renders every failure the same way (status, JSON body, one log line).

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediaconv_core::{AppError, ErrorMetadata, LogLevel};
use mediaconv_processing::{ConversionError, ValidationError};
use serde::Serialize;
use std::sync::OnceLock;
use utoipa::ToSchema;

/// Set once at startup from `Config::is_production`; unset means development.
static PRODUCTION_MODE: OnceLock<bool> = OnceLock::new();

/// Record whether error bodies may carry details. Later calls are ignored.
pub fn init_error_exposure(is_production: bool) {
    if PRODUCTION_MODE.set(is_production).is_err() {
        tracing::debug!("Error exposure mode already set");
    }
}

fn is_production() -> bool {
    PRODUCTION_MODE.get().copied().unwrap_or(false)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: IntoResponse and AppError both live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// Body extractor rejections; an over-limit body stays a 413.
pub fn body_rejection(status: StatusCode, body_text: String) -> HttpAppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        HttpAppError(AppError::PayloadTooLarge(format!(
            "Request body too large: {}",
            body_text
        )))
    } else {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            body_text
        )))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        body_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app = match err {
            ValidationError::FileTooLarge { max, .. } => AppError::PayloadTooLarge(format!(
                "File size exceeds maximum allowed size of {} bytes",
                max
            )),
            ValidationError::InvalidExtension { extension, allowed } => {
                AppError::InvalidInput(format!(
                    "Invalid file extension '{}'. Allowed extensions: {}",
                    extension,
                    allowed.join(", ")
                ))
            }
            ValidationError::InvalidFilename(filename) => AppError::InvalidInput(format!(
                "Missing file extension (filename: {})",
                filename
            )),
            ValidationError::EmptyFile => AppError::InvalidInput("File is empty".to_string()),
        };
        HttpAppError(app)
    }
}

/// Image codec failures
impl From<ConversionError> for HttpAppError {
    fn from(err: ConversionError) -> Self {
        HttpAppError(AppError::ImageProcessing(err.to_string()))
    }
}

/// Map an audio pipeline failure; the image mapping is the `From` impl.
pub fn audio_conversion_error(err: ConversionError) -> HttpAppError {
    HttpAppError(AppError::AudioConversion(err.to_string()))
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Build the JSON body for an error. Sensitive errors and production never expose details.
pub fn error_body(app_error: &AppError, is_production: bool) -> ErrorResponse {
    let expose_details = !is_production && !app_error.is_sensitive();
    ErrorResponse {
        error: app_error.client_message(),
        details: expose_details.then(|| app_error.to_string()),
        error_type: expose_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(error_body(app_error, is_production()))).into_response()
    }
}
