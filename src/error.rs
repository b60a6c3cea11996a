//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Malformed version strings
//! - ManifestError: Issues with manifest file parsing and rewriting
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with CLI or config file settings
//! - IoError: File system and subprocess failures

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{ErrorKind, RegistryKind};

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Version parsing errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors raised while parsing a version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// No numeric release segment could be read
    #[error("invalid version '{text}'")]
    InvalidVersion { text: String },
}

impl VersionError {
    /// Creates a new InvalidVersion error
    pub fn invalid(text: impl Into<String>) -> Self {
        VersionError::InvalidVersion { text: text.into() }
    }
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A manifest line or document could not be tokenized
    #[error("malformed manifest{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Malformed {
        /// 1-based line number, when the failure is tied to a line
        line: Option<usize>,
        message: String,
    },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to package registry communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    NotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Registry throttled the request
    #[error("rate limit exceeded for {registry} registry{}", retry_after.map(|d| format!(" (retry after {}s)", d.as_secs())).unwrap_or_default())]
    RateLimited {
        registry: String,
        retry_after: Option<Duration>,
    },

    /// Response body could not be interpreted
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Request or batch deadline elapsed
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting is outside its accepted range
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Config file could not be parsed
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Path not found
    #[error("path not found: {path}")]
    NotFound { path: PathBuf },

    /// A helper command could not be started
    #[error("failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A helper command exited unsuccessfully
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
}

impl ManifestError {
    /// Creates a Malformed error tied to a line
    pub fn malformed_line(line: usize, message: impl Into<String>) -> Self {
        ManifestError::Malformed {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Creates a Malformed error for the whole document
    pub fn malformed(message: impl Into<String>) -> Self {
        ManifestError::Malformed {
            line: None,
            message: message.into(),
        }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl RegistryError {
    /// Creates a new NotFound error
    pub fn not_found(package: impl Into<String>, registry: RegistryKind) -> Self {
        RegistryError::NotFound {
            package: package.into(),
            registry: registry.registry_name().to_string(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: RegistryKind,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.registry_name().to_string(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimited error
    pub fn rate_limited(registry: RegistryKind, retry_after: Option<Duration>) -> Self {
        RegistryError::RateLimited {
            registry: registry.registry_name().to_string(),
            retry_after,
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: RegistryKind,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.registry_name().to_string(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: RegistryKind) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.registry_name().to_string(),
        }
    }

    /// Returns the serializable tag reported in update results
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::NetworkError { .. } => ErrorKind::NetworkError,
            RegistryError::RateLimited { .. } => ErrorKind::RateLimited,
            RegistryError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
            RegistryError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Returns the registry's Retry-After hint, if it sent one
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RegistryError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns true for failures worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RegistryError::NetworkError { .. }
                | RegistryError::Timeout { .. }
                | RegistryError::RateLimited { .. }
        )
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        IoError::NotFound { path: path.into() }
    }

    /// Creates a new CommandSpawn error
    pub fn command_spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        IoError::CommandSpawn {
            command: command.into(),
            source,
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(
        command: impl Into<String>,
        status: impl ToString,
        stderr: impl Into<String>,
    ) -> Self {
        IoError::CommandFailed {
            command: command.into(),
            status: status.to_string(),
            stderr: stderr.into(),
        }
    }
}
