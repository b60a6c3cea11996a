//! Per-package check results

use super::{PackageDeclaration, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why a registry lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Package does not exist in the registry
    NotFound,
    /// Transport failure or unexpected status
    NetworkError,
    /// Registry throttled the request
    RateLimited,
    /// Response body could not be interpreted
    InvalidResponse,
    /// Request or batch deadline elapsed
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::NetworkError => write!(f, "network error"),
            ErrorKind::RateLimited => write!(f, "rate limited"),
            ErrorKind::InvalidResponse => write!(f, "invalid response"),
            ErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Derived classification of an UpdateResult
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// A newer release exists
    Outdated,
    /// The declared version is the latest
    UpToDate,
    /// Latest is known but there is no version to compare against
    Unknown,
    /// Lookup failed
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Outdated => write!(f, "outdated"),
            Status::UpToDate => write!(f, "up to date"),
            Status::Unknown => write!(f, "unknown"),
            Status::Failed => write!(f, "failed"),
        }
    }
}

/// Result of checking one declaration against its registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResult {
    /// Package name
    pub package: String,
    /// Constraint text as written in the manifest
    pub declared: String,
    /// Version in use, when the constraint names one
    pub current: Option<Version>,
    /// Latest version reported by the registry
    pub latest: Option<Version>,
    /// Whether this is a development dependency
    pub is_dev: bool,
    /// Whether a newer release exists
    pub outdated: bool,
    /// Lookup failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    /// Seconds the registry asked to wait before retrying a throttled lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

impl UpdateResult {
    /// Creates a result for a successful lookup
    ///
    /// `outdated` of `None` means there was nothing to compare against;
    /// such results carry no current version.
    pub fn checked(
        declaration: &PackageDeclaration,
        current: Option<Version>,
        latest: Version,
        outdated: Option<bool>,
    ) -> Self {
        let current = if outdated.is_some() { current } else { None };
        Self {
            package: declaration.name.clone(),
            declared: declaration.declared.clone(),
            current,
            latest: Some(latest),
            is_dev: declaration.is_dev,
            outdated: outdated.unwrap_or(false),
            error: None,
            retry_after_secs: None,
        }
    }

    /// Creates a result for a failed lookup
    pub fn failed(declaration: &PackageDeclaration, kind: ErrorKind) -> Self {
        Self {
            package: declaration.name.clone(),
            declared: declaration.declared.clone(),
            current: declaration.reference().cloned(),
            latest: None,
            is_dev: declaration.is_dev,
            outdated: false,
            error: Some(kind),
            retry_after_secs: None,
        }
    }

    /// Attaches the registry's Retry-After hint to a failed result
    pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
        self.retry_after_secs = retry_after.map(|d| d.as_secs());
        self
    }

    /// Returns the derived status
    pub fn status(&self) -> Status {
        if self.error.is_some() {
            Status::Failed
        } else if self.outdated {
            Status::Outdated
        } else if self.current.is_none() {
            Status::Unknown
        } else {
            Status::UpToDate
        }
    }

    /// Returns true if a newer release exists
    pub fn is_outdated(&self) -> bool {
        self.outdated
    }

    /// Returns true if the lookup failed
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Returns the version a rewrite should apply, if any
    pub fn upgrade_target(&self) -> Option<&Version> {
        if self.outdated {
            self.latest.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, RegistryKind};

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    fn requests() -> PackageDeclaration {
        PackageDeclaration::production(
            "requests",
            Constraint::Exact(v("2.31.0")),
            "==2.31.0",
            RegistryKind::Pip,
        )
    }

    #[test]
    fn test_checked_outdated() {
        let result = UpdateResult::checked(&requests(), Some(v("2.31.0")), v("2.32.3"), Some(true));
        assert_eq!(result.package, "requests");
        assert_eq!(result.declared, "==2.31.0");
        assert!(result.is_outdated());
        assert_eq!(result.status(), Status::Outdated);
        assert_eq!(result.upgrade_target(), Some(&v("2.32.3")));
    }

    #[test]
    fn test_checked_up_to_date() {
        let result = UpdateResult::checked(&requests(), Some(v("2.31.0")), v("2.31.0"), Some(false));
        assert!(!result.is_outdated());
        assert_eq!(result.status(), Status::UpToDate);
        assert_eq!(result.upgrade_target(), None);
    }

    #[test]
    fn test_checked_unknown_drops_current() {
        let decl = PackageDeclaration::production(
            "flask",
            Constraint::Unconstrained,
            "",
            RegistryKind::Pip,
        );
        let result = UpdateResult::checked(&decl, Some(v("1.0")), v("3.0.0"), None);
        assert!(result.current.is_none());
        assert!(!result.outdated);
        assert!(result.error.is_none());
        assert_eq!(result.status(), Status::Unknown);
    }

    #[test]
    fn test_failed() {
        let result = UpdateResult::failed(&requests(), ErrorKind::NotFound);
        assert!(result.is_failed());
        assert!(!result.outdated);
        assert!(result.latest.is_none());
        assert_eq!(result.status(), Status::Failed);
        assert_eq!(result.upgrade_target(), None);
    }

    #[test]
    fn test_failed_with_retry_after() {
        let result = UpdateResult::failed(&requests(), ErrorKind::RateLimited)
            .with_retry_after(Some(Duration::from_secs(30)));
        assert_eq!(result.retry_after_secs, Some(30));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "rate_limited");
        assert_eq!(json["retry_after_secs"], 30);
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::RateLimited.to_string(), "rate limited");
        assert_eq!(ErrorKind::InvalidResponse.to_string(), "invalid response");
    }

    #[test]
    fn test_serde_result() {
        let result = UpdateResult::failed(&requests(), ErrorKind::Timeout);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "timeout");
        assert_eq!(json["current"], "2.31.0");
        assert_eq!(json["latest"], serde_json::Value::Null);

        let ok = UpdateResult::checked(&requests(), Some(v("2.31.0")), v("2.32.3"), Some(true));
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("retry_after_secs").is_none());
        let parsed: UpdateResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, ok);
    }
}
