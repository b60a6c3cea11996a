//! Registry lookups for latest package versions
//!
//! This module provides:
//! - The `Fetcher` transport seam and its reqwest implementation
//! - PyPI and npm URL building and response parsing
//! - A TTL cache shared across lookups
//! - `RegistryClient`, which combines cache, transport and retries

mod cache;
mod client;
mod http;
pub mod npm;
pub mod pypi;

pub use cache::{CacheEntry, VersionCache, DEFAULT_TTL};
pub use client::{
    RegistryClient, RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_AFTER,
};
pub use http::{HttpFetcher, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use crate::domain::{RegistryKind, Version};
use crate::error::RegistryError;
use async_trait::async_trait;

/// Transport returning the raw registry response for a package
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the response body describing the package's latest release
    async fn fetch(&self, kind: RegistryKind, package: &str) -> Result<String, RegistryError>;
}

/// Extract the latest version from a response body of the given registry
pub fn parse_latest(
    kind: RegistryKind,
    package: &str,
    body: &str,
) -> Result<Version, RegistryError> {
    match kind {
        RegistryKind::Pip => pypi::parse_latest(package, body),
        RegistryKind::Npm => npm::parse_latest(package, body),
    }
}
