//! Check result summary types
//!
//! Provides structures for tracking check results at file and overall levels.

use super::{Dialect, Status, UpdateResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Check results for a single manifest file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestReport {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Dialect of this manifest
    pub dialect: Dialect,
    /// Per-package results, in declaration order
    pub results: Vec<UpdateResult>,
    /// Parse failure that stopped this manifest from being checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the manifest was rewritten on disk
    pub modified: bool,
}

impl ManifestReport {
    /// Creates a report for a checked manifest
    pub fn new(path: impl Into<PathBuf>, dialect: Dialect, results: Vec<UpdateResult>) -> Self {
        Self {
            path: path.into(),
            dialect,
            results,
            error: None,
            modified: false,
        }
    }

    /// Creates a report for a manifest that could not be parsed
    pub fn failed(path: impl Into<PathBuf>, dialect: Dialect, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dialect,
            results: Vec::new(),
            error: Some(error.into()),
            modified: false,
        }
    }

    /// Returns the number of results with the given status
    pub fn count(&self, status: Status) -> usize {
        self.results.iter().filter(|r| r.status() == status).count()
    }

    /// Returns all outdated results
    pub fn outdated(&self) -> impl Iterator<Item = &UpdateResult> {
        self.results.iter().filter(|r| r.is_outdated())
    }

    /// Returns true if any dependency is outdated
    pub fn has_outdated(&self) -> bool {
        self.outdated().next().is_some()
    }

    /// Returns true if parsing or any lookup failed
    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.results.iter().any(|r| r.is_failed())
    }
}

/// Overall summary of a check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Results for each manifest file processed
    pub manifests: Vec<ManifestReport>,
    /// When the check ran
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    /// Creates an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            manifests: Vec::new(),
            checked_at: Utc::now(),
        }
    }

    /// Adds a manifest report
    pub fn add_manifest(&mut self, manifest: ManifestReport) {
        self.manifests.push(manifest);
    }

    /// Returns the total number of files processed
    pub fn files_processed(&self) -> usize {
        self.manifests.len()
    }

    /// Returns the total number of files rewritten
    pub fn files_modified(&self) -> usize {
        self.manifests.iter().filter(|m| m.modified).count()
    }

    /// Returns the total number of dependencies checked
    pub fn total_dependencies(&self) -> usize {
        self.manifests.iter().map(|m| m.results.len()).sum()
    }

    /// Returns the total number of results with the given status
    pub fn count(&self, status: Status) -> usize {
        self.manifests.iter().map(|m| m.count(status)).sum()
    }

    /// Returns true if any dependency is outdated
    pub fn has_outdated(&self) -> bool {
        self.manifests.iter().any(|m| m.has_outdated())
    }

    /// Returns true if any manifest failed to parse or any lookup failed
    pub fn has_errors(&self) -> bool {
        self.manifests.iter().any(|m| m.has_errors())
    }
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::new()
    }
}
