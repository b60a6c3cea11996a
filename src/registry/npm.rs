//! npm registry API
//!
//! API endpoint: https://registry.npmjs.org/{package}/latest

use crate::domain::{RegistryKind, Version};
use crate::error::RegistryError;
use serde::Deserialize;

/// npm registry base URL
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Manifest of the release tagged `latest`
#[derive(Debug, Deserialize)]
struct NpmLatestResponse {
    version: String,
}

/// Encode package name for URL (handles scoped packages)
pub fn encode_package_name(package: &str) -> String {
    if package.starts_with('@') {
        // @scope/name -> @scope%2Fname
        package.replace('/', "%2F")
    } else {
        package.to_string()
    }
}

/// Build the latest-release URL for a package
pub fn build_url(base_url: &str, package: &str) -> String {
    format!(
        "{}/{}/latest",
        base_url.trim_end_matches('/'),
        encode_package_name(package)
    )
}

/// Extract the latest version from a response body
pub fn parse_latest(package: &str, body: &str) -> Result<Version, RegistryError> {
    let response: NpmLatestResponse = serde_json::from_str(body).map_err(|e| {
        RegistryError::invalid_response(
            package,
            RegistryKind::Npm,
            format!("failed to parse JSON: {}", e),
        )
    })?;

    Version::parse(&response.version)
        .map_err(|e| RegistryError::invalid_response(package, RegistryKind::Npm, e.to_string()))
}
