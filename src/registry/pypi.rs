//! PyPI JSON API
//!
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::{RegistryKind, Version};
use crate::error::RegistryError;
use crate::parser::pip;
use serde::Deserialize;

/// PyPI base URL
pub const DEFAULT_BASE_URL: &str = "https://pypi.org";

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    info: PyPIInfo,
}

#[derive(Debug, Deserialize)]
struct PyPIInfo {
    /// Latest release version
    version: String,
}

/// Build the metadata URL for a package
pub fn build_url(base_url: &str, package: &str) -> String {
    format!("{}/pypi/{}/json", base_url.trim_end_matches('/'), package)
}

/// Extract the latest version from a metadata response body
pub fn parse_latest(package: &str, body: &str) -> Result<Version, RegistryError> {
    let response: PyPIResponse = serde_json::from_str(body).map_err(|e| {
        RegistryError::invalid_response(
            package,
            RegistryKind::Pip,
            format!("failed to parse JSON: {}", e),
        )
    })?;

    pip::parse_version(&response.info.version)
        .map_err(|e| RegistryError::invalid_response(package, RegistryKind::Pip, e.to_string()))
}
