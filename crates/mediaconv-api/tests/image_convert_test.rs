//! Upload-based image conversion tests.
//!
//! Run with: `cargo test -p mediaconv-api --test image_convert_test`

mod helpers;

use axum::http::header;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::{fixtures, setup_test_app, setup_test_app_with};
use std::sync::Arc;

fn image_form(data: Vec<u8>, filename: &str) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(filename.to_string())
        .mime_type("application/octet-stream");
    MultipartForm::new().add_part("image", part)
}

#[tokio::test]
async fn test_convert_png_to_webp() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "webp")
        .multipart(image_form(fixtures::create_test_png(100, 100), "photo.png"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/webp");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"photo.webp\""
    );

    let decoded = image::load_from_memory(response.as_bytes()).expect("output should decode");
    assert_eq!((decoded.width(), decoded.height()), (100, 100));
}

#[tokio::test]
async fn test_convert_format_is_case_insensitive() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "JPG")
        .add_query_param("quality", "lightest")
        .multipart(image_form(fixtures::create_test_png(40, 30), "shot.png"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(response.headers()["x-filename"], "shot.jpg");
}

#[tokio::test]
async fn test_convert_missing_file() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "png")
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No image file uploaded");
}

#[tokio::test]
async fn test_convert_wrong_field_name() {
    let app = setup_test_app().await;
    let part = Part::bytes(Bytes::from(fixtures::create_test_png(8, 8))).file_name("a.png");

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "png")
        .multipart(MultipartForm::new().add_part("file", part))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_convert_invalid_format() {
    let app = setup_test_app().await;

    for format in ["gif", "jpeg", ""] {
        let response = app
            .client()
            .post("/convert")
            .add_query_param("format", format)
            .multipart(image_form(fixtures::create_test_png(8, 8), "a.png"))
            .await;

        assert_eq!(response.status_code(), 400, "format {:?}", format);
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["error"],
            "Invalid target format. Supported formats: jpg, webp, png"
        );
    }
}

#[tokio::test]
async fn test_convert_invalid_quality() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "webp")
        .add_query_param("quality", "ultra")
        .multipart(image_form(fixtures::create_test_png(8, 8), "a.png"))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_convert_disallowed_extension() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "png")
        .multipart(image_form(fixtures::create_test_png(8, 8), "vector.svg"))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_convert_undecodable_image_hides_details() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "png")
        .multipart(image_form(fixtures::garbage_bytes(), "broken.png"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Error processing image");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_convert_oversize_image() {
    let app = setup_test_app_with(Arc::new(helpers::mock_codecs::CopyTranscoder), |config| {
        config.max_image_size_bytes = 1024;
    })
    .await;

    let response = app
        .client()
        .post("/convert")
        .add_query_param("format", "webp")
        .multipart(image_form(vec![0u8; 4096], "big.png"))
        .await;

    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}

const BOUNDARY: &str = "mediaconv-test-boundary";

/// Hand-built multipart body so the request can carry an exact `Content-Length`
fn raw_multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn post_raw_multipart(app: &helpers::TestApp, body: Vec<u8>) -> axum_test::TestResponse {
    let content_length = body.len().to_string();
    app.client()
        .post("/convert")
        .add_query_param("format", "png")
        .bytes(Bytes::from(body))
        .content_type(&format!("multipart/form-data; boundary={}", BOUNDARY))
        .add_header("Content-Length", content_length)
        .await
}

#[tokio::test]
async fn test_oversized_upload_with_content_length_is_json_413() {
    let app = setup_test_app().await;
    let big = vec![0u8; 11 * 1024 * 1024];

    let body = raw_multipart(&[("image", Some("huge.png"), big.as_slice())]);

    let response = post_raw_multipart(&app, body).await;

    assert_eq!(response.status_code(), 413);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_request_body_over_overall_limit_is_json_413() {
    // Overall cap becomes 64 KiB + 64 KiB; the ignored field alone exceeds it
    let app = setup_test_app_with(Arc::new(helpers::mock_codecs::CopyTranscoder), |config| {
        config.max_image_size_bytes = 1024;
        config.max_audio_size_bytes = 1024;
    })
    .await;
    let padding = vec![b'a'; 200 * 1024];
    let png = fixtures::create_test_png(4, 4);

    let response = post_raw_multipart(
        &app,
        raw_multipart(&[
            ("padding", None, padding.as_slice()),
            ("image", Some("small.png"), png.as_slice()),
        ]),
    )
    .await;

    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
}
