//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p mediaconv-api`. The real image codec is
//! used throughout; ffmpeg is replaced by the fakes in `mock_codecs`.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_codecs;

use axum::http::header;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use axum_test::TestServer;
use mediaconv_api::services::HttpFetcher;
use mediaconv_api::setup::routes;
use mediaconv_api::state::AppState;
use mediaconv_core::{Config, ConverterConfig};
use mediaconv_processing::{AudioTranscoder, ImageConverter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Test application: server plus the directories it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub work_dir: PathBuf,
    pub static_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently left in the conversion work directory
    pub fn work_dir_entries(&self) -> usize {
        std::fs::read_dir(&self.work_dir)
            .expect("Failed to read work dir")
            .count()
    }
}

/// App with the default test config and a copying audio transcoder
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(mock_codecs::CopyTranscoder), |_| {}).await
}

/// App with a custom transcoder and config overrides
pub async fn setup_test_app_with(
    transcoder: Arc<dyn AudioTranscoder>,
    configure: impl FnOnce(&mut ConverterConfig),
) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let work_dir = temp_dir.path().join("work");
    let static_dir = temp_dir.path().join("public");
    std::fs::create_dir_all(&work_dir).expect("Failed to create work dir");
    std::fs::create_dir_all(&static_dir).expect("Failed to create static dir");

    let config = create_test_config(&work_dir, &static_dir, configure);

    let fetcher = HttpFetcher::from_config(&config).expect("Failed to create fetcher");
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(ImageConverter::new()),
        transcoder,
        Arc::new(fetcher),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        work_dir,
        static_dir,
        _temp_dir: temp_dir,
    }
}

fn create_test_config(
    work_dir: &Path,
    static_dir: &Path,
    configure: impl FnOnce(&mut ConverterConfig),
) -> Config {
    let mut config = ConverterConfig::default();
    config.base.environment = "test".to_string();
    config.base.static_dir = static_dir.to_path_buf();
    config.conversion_temp_dir = Some(work_dir.to_path_buf());
    config.url_fetch_timeout_secs = 1;
    config.url_fetch_block_private = false;
    configure(&mut config);
    Config(Box::new(config))
}

/// Local origin for `/convert-url` tests, bound on 127.0.0.1.
///
/// `/images/cat.png` serves a small PNG, `/missing.png` is a 404, `/hang`
/// never answers within any test timeout, `/moved.png` redirects to the PNG on
/// the same host and `/to-localhost.png` redirects to it via `localhost`.
pub async fn spawn_image_origin() -> SocketAddr {
    let png = fixtures::create_test_png(32, 24);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind origin");
    let addr = listener.local_addr().expect("Origin has no address");

    let same_host = format!("http://{}/images/cat.png", addr);
    let via_localhost = format!("http://localhost:{}/images/cat.png", addr.port());

    let app = Router::new()
        .route(
            "/images/cat.png",
            get(move || {
                let png = png.clone();
                async move { ([(header::CONTENT_TYPE, "image/png")], png) }
            }),
        )
        .route(
            "/hang",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "too late"
            }),
        )
        .route(
            "/moved.png",
            get(move || {
                let target = same_host.clone();
                async move { Redirect::temporary(&target) }
            }),
        )
        .route(
            "/to-localhost.png",
            get(move || {
                let target = via_localhost.clone();
                async move { Redirect::temporary(&target) }
            }),
        );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}
