//! HTTP transport for registry lookups
//!
//! This module provides the production `Fetcher` with:
//! - Configurable timeout, User-Agent and registry base URLs
//! - Status mapping: 404 not found, 429 rate limited, other failures as
//!   network errors
//!
//! Retrying is left to `RegistryClient`.

use crate::domain::RegistryKind;
use crate::error::RegistryError;
use crate::registry::{npm, pypi, Fetcher};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("depcheck/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed transport
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    pypi_url: String,
    npm_url: String,
}

impl HttpFetcher {
    /// Create a new fetcher with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new fetcher with custom timeout and User-Agent
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| RegistryError::NetworkError {
                package: String::new(),
                registry: "HTTP client".to_string(),
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            pypi_url: pypi::DEFAULT_BASE_URL.to_string(),
            npm_url: npm::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point lookups at different registry hosts
    pub fn with_base_urls(mut self, pypi_url: impl Into<String>, npm_url: impl Into<String>) -> Self {
        self.pypi_url = pypi_url.into();
        self.npm_url = npm_url.into();
        self
    }

    /// Build the lookup URL for a package
    pub fn url_for(&self, kind: RegistryKind, package: &str) -> String {
        match kind {
            RegistryKind::Pip => pypi::build_url(&self.pypi_url, package),
            RegistryKind::Npm => npm::build_url(&self.npm_url, package),
        }
    }
}

fn transport_error(kind: RegistryKind, package: &str, error: reqwest::Error) -> RegistryError {
    if error.is_timeout() {
        RegistryError::timeout(package, kind)
    } else {
        RegistryError::network_error(package, kind, error.to_string())
    }
}

/// Reads a `Retry-After` header given in seconds
fn retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, kind: RegistryKind, package: &str) -> Result<String, RegistryError> {
        let url = self.url_for(kind, package);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(kind, package, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::not_found(package, kind));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RegistryError::rate_limited(kind, retry_after(response.headers())));
        }
        if !status.is_success() {
            return Err(RegistryError::network_error(
                package,
                kind,
                format!("HTTP {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| transport_error(kind, package, e))
    }
}
