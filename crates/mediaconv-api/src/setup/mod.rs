//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::services::HttpFetcher;
use crate::state::AppState;
use anyhow::{Context, Result};
use mediaconv_core::Config;
use mediaconv_processing::{FfmpegTranscoder, ImageConverter};
use std::process::Stdio;
use std::sync::Arc;

/// Validate config, start tracing, wire the real codecs and build the router
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_json(), config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    check_ffmpeg(config.ffmpeg_path()).await;

    let state = build_state(&config)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Production collaborators: image crate codecs, ffmpeg, reqwest
pub fn build_state(config: &Config) -> Result<Arc<AppState>> {
    let fetcher = HttpFetcher::from_config(config)?;

    Ok(Arc::new(AppState::new(
        config.clone(),
        Arc::new(ImageConverter::new()),
        Arc::new(FfmpegTranscoder::new(config.ffmpeg_path())),
        Arc::new(fetcher),
    )))
}

/// Audio conversions fail at request time without ffmpeg; say so at startup.
async fn check_ffmpeg(ffmpeg_path: &str) {
    let status = tokio::process::Command::new(ffmpeg_path)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {
            tracing::debug!(ffmpeg_path = %ffmpeg_path, "ffmpeg available");
        }
        Ok(status) => {
            tracing::warn!(ffmpeg_path = %ffmpeg_path, %status, "ffmpeg -version failed; audio conversion will not work");
        }
        Err(e) => {
            tracing::warn!(ffmpeg_path = %ffmpeg_path, error = %e, "ffmpeg not found; audio conversion will not work");
        }
    }
}
