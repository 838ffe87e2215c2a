//! Remote image retrieval with a hard timeout and a body size cap

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use mediaconv_core::models::file_stem;
use mediaconv_core::{AppError, Config};

use crate::utils::ssrf_validation::{screen_url, validate_url};

const MAX_REDIRECTS: usize = 5;

/// Downloaded body plus the URL basename without extension
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub data: Bytes,
    pub filename_stem: Option<String>,
}

/// URL → bytes. Network, status and size failures surface as `AppError::FetchFailed`.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, AppError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    max_size: usize,
    block_private: bool,
    allowlist: Option<Vec<String>>,
}

impl HttpFetcher {
    pub fn new(
        timeout: Duration,
        max_size: usize,
        block_private: bool,
        allowlist: Option<Vec<String>>,
    ) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(redirect_policy(block_private, allowlist.clone()))
            .user_agent(concat!("mediaconv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            max_size,
            block_private,
            allowlist,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        Self::new(
            config.url_fetch_timeout(),
            config.url_fetch_max_size_bytes(),
            config.url_fetch_block_private(),
            config.url_fetch_allowlist().map(|list| list.to_vec()),
        )
    }

    fn too_large(&self) -> AppError {
        AppError::FetchFailed(format!(
            "Response exceeds maximum size of {} bytes",
            self.max_size
        ))
    }
}

/// Follow at most `MAX_REDIRECTS` hops, screening each target like the first URL
fn redirect_policy(
    block_private: bool,
    allowlist: Option<Vec<String>>,
) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error(format!("Stopped after {} redirects", MAX_REDIRECTS));
        }

        match screen_url(attempt.url(), !block_private, allowlist.as_deref()) {
            Ok(_) => attempt.follow(),
            Err(reason) => {
                tracing::warn!(url = %attempt.url(), reason = %reason, "Redirect target rejected");
                attempt.error(format!("Redirect target rejected: {}", reason))
            }
        }
    })
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFile, AppError> {
        let parsed_url = validate_url(url, !self.block_private, self.allowlist.as_deref())
            .await
            .map_err(|e| {
                tracing::warn!(url = %url, error = %e, "URL validation failed");
                AppError::InvalidInput(format!("URL validation failed: {}", e))
            })?;

        let mut response = self
            .client
            .get(parsed_url.clone())
            .send()
            .await
            .map_err(|e| AppError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::FetchFailed(format!(
                "URL returned status code: {}",
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_size as u64 {
                return Err(self.too_large());
            }
        }

        let mut buffer = BytesMut::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::FetchFailed(format!("Failed to read response body: {}", e)))?
        {
            if buffer.len() + chunk.len() > self.max_size {
                return Err(self.too_large());
            }
            buffer.extend_from_slice(&chunk);
        }

        if buffer.is_empty() {
            return Err(AppError::FetchFailed("Response body is empty".to_string()));
        }

        let filename_stem = parsed_url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .and_then(file_stem);

        tracing::debug!(
            url = %parsed_url,
            size = buffer.len(),
            "Fetched remote file"
        );

        Ok(FetchedFile {
            data: buffer.freeze(),
            filename_stem,
        })
    }
}
