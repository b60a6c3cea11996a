//! Registry client with caching and retries
//!
//! This module provides the latest-version lookup used by the reconciler:
//! - Cache first, keyed by registry and normalized name
//! - Exponential backoff retry for transient failures
//! - Rate limit handling that honours `Retry-After` up to a ceiling

use crate::domain::{RegistryKind, Version};
use crate::error::RegistryError;
use crate::registry::{parse_latest, Fetcher, VersionCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default base delay for exponential backoff
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Longest server-requested wait that is still honoured
pub const DEFAULT_MAX_RETRY_AFTER: Duration = Duration::from_secs(10);

/// How transient failures are retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles each time
    pub base_delay: Duration,
    /// A `Retry-After` hint above this fails the lookup immediately
    pub max_retry_after: Duration,
}

impl RetryPolicy {
    /// Returns the backoff before retry number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_retry_after: DEFAULT_MAX_RETRY_AFTER,
        }
    }
}

/// Latest-version lookups through a shared cache
#[derive(Clone)]
pub struct RegistryClient {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<VersionCache>,
    policy: RetryPolicy,
}

impl RegistryClient {
    /// Create a client over the given transport and cache
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: Arc<VersionCache>) -> Self {
        Self {
            fetcher,
            cache,
            policy: RetryPolicy::default(),
        }
    }

    /// Set the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the shared cache
    pub fn cache(&self) -> &VersionCache {
        &self.cache
    }

    /// Returns the retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Resolve the latest version of a package
    pub async fn latest_version(
        &self,
        kind: RegistryKind,
        package: &str,
    ) -> Result<Version, RegistryError> {
        if let Some(version) = self.cache.get(kind, package) {
            debug!(registry = %kind, package, %version, "cache hit");
            return Ok(version);
        }

        let version = self.fetch_with_retry(kind, package).await?;
        debug!(registry = %kind, package, %version, "resolved latest version");
        self.cache.insert(kind, package, version.clone());
        Ok(version)
    }

    async fn fetch_with_retry(
        &self,
        kind: RegistryKind,
        package: &str,
    ) -> Result<Version, RegistryError> {
        let mut attempt = 0;

        loop {
            let error = match self.fetcher.fetch(kind, package).await {
                Ok(body) => return parse_latest(kind, package, &body),
                Err(e) => e,
            };

            if !error.is_transient() || attempt >= self.policy.max_retries {
                return Err(error);
            }

            let backoff = self.policy.backoff(attempt);
            let wait = match &error {
                RegistryError::RateLimited {
                    retry_after: Some(hint),
                    ..
                } => {
                    if *hint > self.policy.max_retry_after {
                        warn!(
                            registry = %kind,
                            package,
                            retry_after_secs = hint.as_secs(),
                            "rate limit wait too long, giving up"
                        );
                        return Err(error);
                    }
                    backoff.max(*hint)
                }
                _ => backoff,
            };

            attempt += 1;
            warn!(
                registry = %kind,
                package,
                attempt,
                wait_ms = wait.as_millis() as u64,
                error = %error,
                "retrying lookup"
            );
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays scripted responses and counts calls
    struct ScriptedFetcher {
        responses: Mutex<VecDeque<Result<String, RegistryError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<Result<String, RegistryError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, kind: RegistryKind, package: &str) -> Result<String, RegistryError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RegistryError::network_error(package, kind, "script exhausted")))
        }
    }

    fn pypi_body(version: &str) -> Result<String, RegistryError> {
        Ok(format!(r#"{{"info": {{"version": "{}"}}}}"#, version))
    }

    fn client(fetcher: Arc<ScriptedFetcher>) -> RegistryClient {
        RegistryClient::new(fetcher, Arc::new(VersionCache::default()))
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_retry_after, Duration::from_secs(10));
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_fetch_within_ttl() {
        let fetcher = ScriptedFetcher::new(vec![pypi_body("2.32.3")]);
        let client = client(fetcher.clone());

        let first = client.latest_version(RegistryKind::Pip, "requests").await.unwrap();
        let second = client.latest_version(RegistryKind::Pip, "requests").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_ttl() {
        let fetcher = ScriptedFetcher::new(vec![pypi_body("13.0.0"), pypi_body("13.7.1")]);
        let client = RegistryClient::new(
            fetcher.clone(),
            Arc::new(VersionCache::new(Duration::from_secs(30))),
        );

        client.latest_version(RegistryKind::Pip, "rich").await.unwrap();
        tokio::time::advance(Duration::from_secs(31)).await;
        let refreshed = client.latest_version(RegistryKind::Pip, "rich").await.unwrap();

        assert_eq!(refreshed, Version::parse("13.7.1").unwrap());
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures_with_backoff() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(RegistryError::network_error("flask", RegistryKind::Pip, "reset")),
            Err(RegistryError::timeout("flask", RegistryKind::Pip)),
            pypi_body("3.1.0"),
        ]);
        let client = client(fetcher.clone());

        let start = Instant::now();
        let version = client.latest_version(RegistryKind::Pip, "flask").await.unwrap();

        assert_eq!(version, Version::parse("3.1.0").unwrap());
        assert_eq!(fetcher.calls(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(RegistryError::network_error("flask", RegistryKind::Pip, "reset")),
            Err(RegistryError::network_error("flask", RegistryKind::Pip, "reset")),
            Err(RegistryError::network_error("flask", RegistryKind::Pip, "reset")),
            pypi_body("3.1.0"),
        ]);
        let client = client(fetcher.clone());

        let result = client.latest_version(RegistryKind::Pip, "flask").await;

        assert!(matches!(result, Err(RegistryError::NetworkError { .. })));
        assert_eq!(fetcher.calls(), 3);
        assert!(client.cache().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_is_not_retried() {
        let fetcher = ScriptedFetcher::new(vec![Err(RegistryError::not_found(
            "nope",
            RegistryKind::Npm,
        ))]);
        let client = client(fetcher.clone());

        let result = client.latest_version(RegistryKind::Npm, "nope").await;

        assert!(matches!(result, Err(RegistryError::NotFound { .. })));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_body_is_not_retried() {
        let fetcher = ScriptedFetcher::new(vec![Ok("not json".to_string()), pypi_body("1.0")]);
        let client = client(fetcher.clone());

        let result = client.latest_version(RegistryKind::Pip, "broken").await;

        assert!(matches!(result, Err(RegistryError::InvalidResponse { .. })));
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_for_retry_after() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(RegistryError::rate_limited(
                RegistryKind::Npm,
                Some(Duration::from_secs(3)),
            )),
            Ok(r#"{"version": "19.1.0"}"#.to_string()),
        ]);
        let client = client(fetcher.clone());

        let start = Instant::now();
        let version = client.latest_version(RegistryKind::Npm, "react").await.unwrap();

        assert_eq!(version, Version::parse("19.1.0").unwrap());
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_without_hint_uses_backoff() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(RegistryError::rate_limited(RegistryKind::Npm, None)),
            Ok(r#"{"version": "19.1.0"}"#.to_string()),
        ]);
        let client = client(fetcher.clone());

        let start = Instant::now();
        client.latest_version(RegistryKind::Npm, "react").await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_hint_over_ceiling_surfaces_immediately() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(RegistryError::rate_limited(
                RegistryKind::Npm,
                Some(Duration::from_secs(60)),
            )),
            Ok(r#"{"version": "19.1.0"}"#.to_string()),
        ]);
        let client = client(fetcher.clone());

        let start = Instant::now();
        let result = client.latest_version(RegistryKind::Npm, "react").await;

        assert!(matches!(result, Err(RegistryError::RateLimited { .. })));
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retries_policy() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(RegistryError::timeout("flask", RegistryKind::Pip)),
            pypi_body("3.1.0"),
        ]);
        let client = client(fetcher.clone()).with_retry_policy(RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        });

        let result = client.latest_version(RegistryKind::Pip, "flask").await;

        assert!(matches!(result, Err(RegistryError::Timeout { .. })));
        assert_eq!(fetcher.calls(), 1);
    }
}
