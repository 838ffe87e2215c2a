//! Binary responses for converted files

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use mediaconv_core::ConversionResult;

use crate::constants::X_FILENAME;
use crate::utils::upload::sanitize_filename;

/// Encoded bytes with `Content-Type` and, when a name is known,
/// `Content-Disposition: attachment` plus `X-Filename`.
pub fn converted_file_response(result: ConversionResult) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(result.content_type),
    );

    if let Some(name) = result.suggested_filename.as_deref() {
        let filename = sanitize_filename(name);
        let disposition = format!("attachment; filename=\"{}\"", filename);
        if let (Ok(disposition), Ok(filename)) = (
            HeaderValue::from_str(&disposition),
            HeaderValue::from_str(&filename),
        ) {
            headers.insert(header::CONTENT_DISPOSITION, disposition);
            headers.insert(HeaderName::from_static(X_FILENAME), filename);
        }
    }

    (headers, Body::from(result.bytes)).into_response()
}
