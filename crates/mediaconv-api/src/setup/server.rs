//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use mediaconv_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(
        addr = %addr,
        environment = %config.environment(),
        production = config.is_production(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        max_image_bytes = config.max_image_size_bytes(),
        max_audio_bytes = config.max_audio_size_bytes(),
        image_extensions = %config.image_allowed_extensions().join(","),
        audio_extensions = %config.audio_allowed_extensions().join(","),
        url_fetch_timeout_secs = config.url_fetch_timeout().as_secs(),
        url_fetch_block_private = config.url_fetch_block_private(),
        ffmpeg_path = %config.ffmpeg_path(),
        temp_dir = %config.conversion_temp_dir().display(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C (SIGINT) or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
}
