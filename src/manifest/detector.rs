//! Manifest file detection
//!
//! Features:
//! - Detects package.json and requirements.txt in a directory root
//! - Picks up requirement variants such as requirements-dev.txt

use crate::domain::Dialect;
use std::path::{Path, PathBuf};

/// Information about a detected manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestInfo {
    /// Path to the manifest file
    pub path: PathBuf,
    /// Dialect of the manifest
    pub dialect: Dialect,
}

impl ManifestInfo {
    /// Create a new ManifestInfo
    pub fn new(path: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            path: path.into(),
            dialect,
        }
    }
}

/// Detect all manifest files in the given directory
///
/// Conventional names come first (package.json, then requirements.txt),
/// followed by other requirement files in name order.
pub fn detect_manifests(dir: &Path) -> Vec<ManifestInfo> {
    let mut manifests: Vec<ManifestInfo> = Dialect::all()
        .iter()
        .map(|dialect| ManifestInfo::new(dir.join(dialect.manifest_filename()), *dialect))
        .filter(|info| info.path.is_file())
        .collect();

    let mut variants: Vec<ManifestInfo> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| Dialect::from_path(&path).map(|dialect| ManifestInfo::new(path, dialect)))
        .filter(|info| !manifests.contains(info))
        .collect();
    variants.sort_by(|a, b| a.path.cmp(&b.path));

    manifests.extend(variants);
    manifests
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    #[test]
    fn test_detect_package_json() {
        let dir = create_temp_dir();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let manifests = detect_manifests(dir.path());
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].dialect, Dialect::Npm);
        assert_eq!(manifests[0].path, dir.path().join("package.json"));
    }

    #[test]
    fn test_detect_multiple_manifests_npm_first() {
        let dir = create_temp_dir();
        fs::write(dir.path().join("requirements.txt"), "").unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let manifests = detect_manifests(dir.path());
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].dialect, Dialect::Npm);
        assert_eq!(manifests[1].dialect, Dialect::Pip);
    }

    #[test]
    fn test_detect_requirement_variants() {
        let dir = create_temp_dir();
        fs::write(dir.path().join("requirements.txt"), "").unwrap();
        fs::write(dir.path().join("requirements-test.txt"), "").unwrap();
        fs::write(dir.path().join("requirements-dev.txt"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let manifests = detect_manifests(dir.path());
        let names: Vec<_> = manifests
            .iter()
            .map(|m| m.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["requirements.txt", "requirements-dev.txt", "requirements-test.txt"]
        );
    }

    #[test]
    fn test_detect_ignores_directories() {
        let dir = create_temp_dir();
        fs::create_dir(dir.path().join("package.json")).unwrap();

        assert!(detect_manifests(dir.path()).is_empty());
    }

    #[test]
    fn test_detect_empty_directory() {
        let dir = create_temp_dir();
        assert!(detect_manifests(dir.path()).is_empty());
    }

    #[test]
    fn test_detect_missing_directory() {
        let dir = create_temp_dir();
        assert!(detect_manifests(&dir.path().join("missing")).is_empty());
    }
}
