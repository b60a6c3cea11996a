//! Packages installed in a Python environment
//!
//! `pip list --format=json` is the source; every entry becomes an exact
//! pip declaration so it reconciles like a pinned requirements line.

use crate::domain::{Constraint, PackageDeclaration, RegistryKind};
use crate::error::{AppError, IoError, ManifestError};
use crate::parser::pip;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

/// Interpreter used when none is given
pub const DEFAULT_PYTHON: &str = "python3";

/// One entry of `pip list --format=json`
#[derive(Debug, Deserialize)]
struct ListedPackage {
    name: String,
    version: String,
}

/// Human-readable command line for reports and errors
pub fn list_command(python: &str) -> String {
    format!("{} -m pip list --format=json", python)
}

/// Run `pip list` with the given interpreter and return its JSON output
pub async fn list_installed(python: &str) -> Result<String, AppError> {
    let command = list_command(python);
    debug!(command = %command, "listing installed packages");

    let output = Command::new(python)
        .args(["-m", "pip", "list", "--format=json", "--disable-pip-version-check"])
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| IoError::command_spawn(&command, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(IoError::command_failed(&command, output.status, stderr).into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Turn a `pip list --format=json` listing into declarations
///
/// Versions pip reports but that cannot be ordered become unconstrained
/// declarations, so the package still gets a latest-version lookup.
pub fn parse_pip_list(listing: &str) -> Result<Vec<PackageDeclaration>, ManifestError> {
    let packages: Vec<ListedPackage> = serde_json::from_str(listing)
        .map_err(|e| ManifestError::malformed_line(e.line(), e.to_string()))?;

    Ok(packages
        .into_iter()
        .map(|package| {
            let constraint = match pip::parse_version(&package.version) {
                Ok(version) => Constraint::Exact(version),
                Err(e) => {
                    warn!(package = %package.name, error = %e, "unorderable installed version");
                    Constraint::Unconstrained
                }
            };
            PackageDeclaration::production(
                package.name,
                constraint,
                format!("=={}", package.version),
                RegistryKind::Pip,
            )
        })
        .collect())
}
