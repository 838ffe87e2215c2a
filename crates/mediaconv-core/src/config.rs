//! Configuration module
//!
//! Server settings and per-media-kind limits, read from the environment
//! (optionally via a `.env` file).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::QualityPreset;

const SERVER_PORT: u16 = 3000;
const MAX_IMAGE_SIZE_MB: usize = 10;
const MAX_AUDIO_SIZE_MB: usize = 1;
const URL_FETCH_TIMEOUT_SECS: u64 = 5;
const URL_FETCH_MAX_SIZE_MB: usize = 10;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

const MB: usize = 1024 * 1024;

/// Base configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_concurrency_limit: usize,
    pub static_dir: PathBuf,
    /// Emit JSON log lines instead of the compact console format
    pub log_json: bool,
}

/// Converter configuration
#[derive(Clone, Debug)]
pub struct ConverterConfig {
    pub base: BaseConfig,
    // Image uploads
    pub max_image_size_bytes: usize,
    pub image_allowed_extensions: Vec<String>,
    pub default_image_quality: QualityPreset,
    // Audio uploads
    pub max_audio_size_bytes: usize,
    pub audio_allowed_extensions: Vec<String>,
    pub ffmpeg_path: String,
    /// Scratch directory for audio transcodes. `None` means the OS temp dir.
    pub conversion_temp_dir: Option<PathBuf>,
    // Remote fetch (image-from-URL)
    pub url_fetch_timeout_secs: u64,
    pub url_fetch_max_size_bytes: usize,
    // If set, only URLs from these domains (or their subdomains) may be fetched
    pub url_fetch_allowlist: Option<Vec<String>>,
    pub url_fetch_block_private: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
                static_dir: PathBuf::from("public"),
                log_json: false,
            },
            max_image_size_bytes: MAX_IMAGE_SIZE_MB * MB,
            image_allowed_extensions: split_list("jpg,jpeg,png,gif,webp"),
            default_image_quality: QualityPreset::Normal,
            max_audio_size_bytes: MAX_AUDIO_SIZE_MB * MB,
            audio_allowed_extensions: split_list("mp3,ogg,oga,m4a"),
            ffmpeg_path: "ffmpeg".to_string(),
            conversion_temp_dir: None,
            url_fetch_timeout_secs: URL_FETCH_TIMEOUT_SECS,
            url_fetch_max_size_bytes: URL_FETCH_MAX_SIZE_MB * MB,
            url_fetch_allowlist: None,
            url_fetch_block_private: false,
        }
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl ConverterConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());
        let is_production = is_production_env(&environment);

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
            log_json: env::var("LOG_FORMAT")
                .map(|s| s.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let max_image_size_mb = env::var("MAX_IMAGE_SIZE_MB")
            .unwrap_or_else(|_| MAX_IMAGE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_IMAGE_SIZE_MB);

        let max_audio_size_mb = env::var("MAX_AUDIO_SIZE_MB")
            .unwrap_or_else(|_| MAX_AUDIO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_AUDIO_SIZE_MB);

        let url_fetch_max_size_mb = env::var("URL_FETCH_MAX_SIZE_MB")
            .unwrap_or_else(|_| URL_FETCH_MAX_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(URL_FETCH_MAX_SIZE_MB);

        let default_image_quality = match env::var("IMAGE_QUALITY") {
            Ok(value) => QualityPreset::parse(&value).map_err(|_| {
                anyhow::anyhow!(
                    "IMAGE_QUALITY must be one of: normal, better, best, lighter, lightest"
                )
            })?,
            Err(_) => QualityPreset::Normal,
        };

        let url_fetch_allowlist = env::var("URL_FETCH_ALLOWLIST")
            .ok()
            .map(|s| split_list(&s))
            .filter(|list| !list.is_empty());

        Ok(Self {
            base,
            max_image_size_bytes: max_image_size_mb * MB,
            image_allowed_extensions: split_list(
                &env::var("IMAGE_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| "jpg,jpeg,png,gif,webp".to_string()),
            ),
            default_image_quality,
            max_audio_size_bytes: max_audio_size_mb * MB,
            audio_allowed_extensions: split_list(
                &env::var("AUDIO_ALLOWED_EXTENSIONS")
                    .unwrap_or_else(|_| "mp3,ogg,oga,m4a".to_string()),
            ),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            conversion_temp_dir: env::var("CONVERSION_TEMP_DIR").ok().map(PathBuf::from),
            url_fetch_timeout_secs: env::var("URL_FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| URL_FETCH_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(URL_FETCH_TIMEOUT_SECS),
            url_fetch_max_size_bytes: url_fetch_max_size_mb * MB,
            url_fetch_allowlist,
            url_fetch_block_private: env::var("URL_FETCH_BLOCK_PRIVATE")
                .ok()
                .and_then(|s| s.to_lowercase().parse().ok())
                .unwrap_or(is_production),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_image_size_bytes == 0 || self.max_audio_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_IMAGE_SIZE_MB and MAX_AUDIO_SIZE_MB must be greater than zero"
            ));
        }

        if self.url_fetch_max_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "URL_FETCH_MAX_SIZE_MB must be greater than zero"
            ));
        }

        if self.url_fetch_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "URL_FETCH_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.image_allowed_extensions.is_empty() || self.audio_allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "IMAGE_ALLOWED_EXTENSIONS and AUDIO_ALLOWED_EXTENSIONS must not be empty"
            ));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!(
                "HTTP_CONCURRENCY_LIMIT must be greater than zero"
            ));
        }

        if let Some(dir) = &self.conversion_temp_dir {
            if !dir.is_dir() {
                return Err(anyhow::anyhow!(
                    "CONVERSION_TEMP_DIR does not exist or is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config(pub Box<ConverterConfig>);

impl Config {
    fn inner(&self) -> &ConverterConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ConverterConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.inner().base.http_concurrency_limit
    }

    pub fn static_dir(&self) -> &std::path::Path {
        &self.inner().base.static_dir
    }

    pub fn log_json(&self) -> bool {
        self.inner().base.log_json
    }

    pub fn max_image_size_bytes(&self) -> usize {
        self.inner().max_image_size_bytes
    }

    pub fn image_allowed_extensions(&self) -> &[String] {
        &self.inner().image_allowed_extensions
    }

    pub fn default_image_quality(&self) -> QualityPreset {
        self.inner().default_image_quality
    }

    pub fn max_audio_size_bytes(&self) -> usize {
        self.inner().max_audio_size_bytes
    }

    pub fn audio_allowed_extensions(&self) -> &[String] {
        &self.inner().audio_allowed_extensions
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    /// Scratch directory for audio transcodes
    pub fn conversion_temp_dir(&self) -> PathBuf {
        self.inner()
            .conversion_temp_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }

    pub fn url_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.inner().url_fetch_timeout_secs)
    }

    pub fn url_fetch_max_size_bytes(&self) -> usize {
        self.inner().url_fetch_max_size_bytes
    }

    pub fn url_fetch_allowlist(&self) -> Option<&[String]> {
        self.inner().url_fetch_allowlist.as_deref()
    }

    pub fn url_fetch_block_private(&self) -> bool {
        self.inner().url_fetch_block_private
    }
}

impl Default for Config {
    fn default() -> Self {
        Config(Box::new(ConverterConfig::default()))
    }
}
