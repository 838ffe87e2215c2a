//! Multipart intake for the upload endpoints

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use mediaconv_core::AppError;
use mediaconv_processing::{MediaValidator, ValidationError};

use crate::error::HttpAppError;

/// A single validated file from a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub filename: String,
}

fn multipart_error(err: MultipartError) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpAppError(AppError::PayloadTooLarge(err.body_text()))
    } else {
        HttpAppError(AppError::InvalidInput(format!(
            "Failed to read multipart: {}",
            err.body_text()
        )))
    }
}

/// Read a field into memory, failing as soon as it grows past `max`
async fn read_capped(mut field: Field<'_>, max: usize) -> Result<Bytes, HttpAppError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        let size = buffer.len() + chunk.len();
        if size > max {
            return Err(ValidationError::FileTooLarge { size, max }.into());
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Extract exactly one file from the field named `field_name`.
///
/// The extension is checked from the part headers before any of the body is
/// read; the size ceiling is enforced while streaming. Other fields are ignored.
pub async fn extract_single_file(
    mut multipart: Multipart,
    field_name: &str,
    validator: &MediaValidator,
    missing_message: &str,
) -> Result<UploadedFile, HttpAppError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }

        if upload.is_some() {
            return Err(AppError::InvalidInput(format!(
                "Multiple file fields are not allowed; send exactly one field named '{}'",
                field_name
            ))
            .into());
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("Uploaded file must have a filename".to_string()))?;

        validator.validate_extension(&filename)?;

        let data = read_capped(field, validator.max_file_size()).await?;
        upload = Some(UploadedFile { data, filename });
    }

    let upload = upload.ok_or_else(|| AppError::InvalidInput(missing_message.to_string()))?;
    validator.validate_file_size(upload.data.len())?;

    Ok(upload)
}

/// Replace anything outside `[A-Za-z0-9._-]` so the name is safe in a header
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches(|c| c == '.' || c == '_').is_empty() {
        return "file".to_string();
    }

    sanitized
}
