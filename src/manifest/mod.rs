//! Manifest file detection, parsing and rewriting
//!
//! This module provides functionality to:
//! - Detect manifest files in a directory
//! - Parse declarations from requirements.txt and package.json
//! - Produce an updated manifest with outdated versions bumped

mod detector;
mod package_json;
mod requirements_txt;
mod writer;

pub use detector::{detect_manifests, ManifestInfo};
pub use writer::{read_manifest, write_manifest, ManifestWriter, WriteResult};

use crate::domain::{Dialect, PackageDeclaration, UpdateResult};
use crate::error::ManifestError;
use std::path::Path;
use tracing::debug;

/// Parse declarations from manifest text of the given dialect
///
/// Blank input yields no declarations for either dialect.
pub fn parse(dialect: Dialect, content: &str) -> Result<Vec<PackageDeclaration>, ManifestError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let declarations = match dialect {
        Dialect::Pip => requirements_txt::parse(content),
        Dialect::Npm => package_json::parse(content),
    }?;

    debug!(dialect = %dialect, count = declarations.len(), "parsed manifest");
    Ok(declarations)
}

/// Rewrite the declared version of every outdated result
///
/// The constraint operator and all other text (comments, extras, markers,
/// key order, whitespace) are kept. Results that match no declaration are
/// ignored.
pub fn generate_updated_manifest(
    dialect: Dialect,
    original: &str,
    results: &[UpdateResult],
) -> Result<String, ManifestError> {
    if original.trim().is_empty() {
        return Ok(original.to_string());
    }

    match dialect {
        Dialect::Pip => requirements_txt::update(original, results),
        Dialect::Npm => package_json::update(original, results),
    }
}

/// Parse declarations from a manifest file path
///
/// The dialect is inferred from the file name, falling back to the content.
pub fn parse_manifest(path: &Path) -> Result<(Dialect, Vec<PackageDeclaration>), ManifestError> {
    let content = read_manifest(path)?;
    let dialect = Dialect::from_path(path).unwrap_or_else(|| Dialect::sniff(&content));
    Ok((dialect, parse(dialect, &content)?))
}
