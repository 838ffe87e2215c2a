//! Route configuration and middleware stack

use crate::api_doc::ApiDoc;
use crate::error::{init_error_exposure, HttpAppError};
use crate::handlers::{audio_convert, health, image_convert, image_convert_url};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method, Response, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use mediaconv_core::{AppError, Config};
use std::any::Any;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// JSON body ceiling for `/convert-url`
const URL_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    init_error_exposure(config.is_production());

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    let request_body_limit = config
        .max_image_size_bytes()
        .max(config.max_audio_size_bytes())
        .max(URL_REQUEST_BODY_BYTES)
        + MULTIPART_OVERHEAD_BYTES;

    tracing::info!(
        http_concurrency_limit,
        request_body_limit,
        static_dir = %config.static_dir().display(),
        "HTTP middleware configured"
    );

    let static_files = ServeDir::new(config.static_dir())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(not_found.into_service());

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/convert", post(image_convert::convert_image))
        .route("/convert-url", post(image_convert_url::convert_image_url))
        .route("/convert-audio", post(audio_convert::convert_audio))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .with_state(state)
        .fallback_service(static_files)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        // Enforced by the body extractors, so over-limit requests get the JSON 413
        .layer(DefaultBodyLimit::max(request_body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic));

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(methods)
            .allow_headers(AnyOrigin)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(AnyOrigin)
    };

    // Browsers only expose these to scripts when listed
    Ok(cors.expose_headers([
        axum::http::header::CONTENT_DISPOSITION,
        axum::http::HeaderName::from_static(crate::constants::X_FILENAME),
    ]))
}

async fn not_found(uri: Uri) -> HttpAppError {
    HttpAppError(AppError::NotFound(format!("No route for {}", uri.path())))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    HttpAppError(AppError::Internal(format!("Handler panicked: {}", detail))).into_response()
}
