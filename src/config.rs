//! Settings for a check run
//!
//! Sources, lowest priority first: built-in defaults, an optional
//! `depcheck.toml` next to the manifests, command-line flags.

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::reconciler::DEFAULT_CONCURRENCY;
use crate::registry::{
    npm, pypi, RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_AFTER,
    DEFAULT_TIMEOUT, DEFAULT_TTL,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Config file looked up in the target directory
pub const CONFIG_FILE_NAME: &str = "depcheck.toml";

/// Tunables for registry lookups and reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Lookups in flight at once
    pub concurrency: usize,
    /// How long a resolved version stays cached, in seconds
    pub cache_ttl_secs: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// First backoff delay, in milliseconds
    pub base_delay_ms: u64,
    /// Longest honoured `Retry-After`, in seconds
    pub max_retry_after_secs: u64,
    /// Per-request timeout, in seconds
    pub request_timeout_secs: u64,
    /// Deadline for a whole batch, in seconds
    pub deadline_secs: Option<u64>,
    /// PyPI base URL
    pub pypi_url: String,
    /// npm registry base URL
    pub npm_url: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            max_retry_after_secs: DEFAULT_MAX_RETRY_AFTER.as_secs(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            deadline_secs: None,
            pypi_url: pypi::DEFAULT_BASE_URL.to_string(),
            npm_url: npm::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CheckConfig {
    /// Parse a config document
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load `depcheck.toml` from `dir`, or defaults if there is none
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&content, &path)
    }

    /// Load the config for a CLI invocation and apply its flags on top
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let config = Self::load(&config_dir(&args.path))?.with_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line flags that were given
    pub fn with_overrides(mut self, args: &CliArgs) -> Self {
        if let Some(concurrency) = args.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(ttl) = args.cache_ttl {
            self.cache_ttl_secs = ttl;
        }
        if let Some(timeout) = args.timeout {
            self.request_timeout_secs = timeout;
        }
        if let Some(retries) = args.retries {
            self.max_retries = retries;
        }
        if let Some(deadline) = args.deadline {
            self.deadline_secs = Some(deadline);
        }
        if let Some(ref url) = args.pypi_url {
            self.pypi_url = url.clone();
        }
        if let Some(ref url) = args.npm_url {
            self.npm_url = url.clone();
        }
        self
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "concurrency",
                "must be at least 1",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "request_timeout_secs",
                "must be at least 1",
            ));
        }
        if self.deadline_secs == Some(0) {
            return Err(ConfigError::invalid_value(
                "deadline_secs",
                "must be at least 1",
            ));
        }
        for (key, url) in [("pypi_url", &self.pypi_url), ("npm_url", &self.npm_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::invalid_value(
                    key,
                    format!("'{}' is not an http(s) URL", url),
                ));
            }
        }
        Ok(())
    }

    /// Returns the cache TTL
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Returns the per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the batch deadline, if any
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    /// Returns the retry policy
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_retry_after: Duration::from_secs(self.max_retry_after_secs),
        }
    }
}

/// Directory searched for the config file
///
/// A manifest path looks in its parent directory.
fn config_dir(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        path.to_path_buf()
    }
}
