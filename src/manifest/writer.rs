//! Manifest file writing and update operations
//!
//! This module provides:
//! - ManifestWriter for applying version bumps to manifest files
//! - Dry-run mode support (no actual file modifications)

use crate::domain::{Dialect, UpdateResult};
use crate::error::ManifestError;
use crate::manifest::generate_updated_manifest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writer for manifest files that applies version bumps
pub struct ManifestWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

/// Result of applying bumps to a manifest file
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Content before rewriting
    pub original: String,
    /// Content after rewriting
    pub updated: String,
    /// Whether the file was actually modified
    pub file_modified: bool,
}

impl WriteResult {
    /// Returns true if rewriting changed the content
    pub fn has_changes(&self) -> bool {
        self.original != self.updated
    }
}

impl ManifestWriter {
    /// Create a new ManifestWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create a ManifestWriter in dry-run mode
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Rewrite the manifest at `path` with the outdated results applied
    pub fn apply(
        &self,
        path: &Path,
        dialect: Dialect,
        results: &[UpdateResult],
    ) -> Result<WriteResult, ManifestError> {
        let original = read_manifest(path)?;
        let updated = generate_updated_manifest(dialect, &original, results)?;

        let mut result = WriteResult {
            path: path.to_path_buf(),
            original,
            updated,
            file_modified: false,
        };

        if result.has_changes() && !self.dry_run {
            write_manifest(path, &result.updated)?;
            result.file_modified = true;
            debug!(path = %path.display(), "manifest rewritten");
        }

        Ok(result)
    }
}

/// Read a manifest file content
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), ManifestError> {
    fs::write(path, content).map_err(|e| ManifestError::write_error(path, e))
}
