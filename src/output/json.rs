//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of check results
//! - Per-manifest result lists with parse errors and rewrite state

use crate::domain::{CheckReport, Dialect, ManifestReport, Status, UpdateResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// When the check ran
    checked_at: DateTime<Utc>,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-manifest results
    manifests: Vec<JsonManifest<'a>>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    manifests: usize,
    dependencies: usize,
    outdated: usize,
    up_to_date: usize,
    unknown: usize,
    failed: usize,
    /// Manifests rewritten on disk
    modified: usize,
}

/// JSON representation of a manifest result
#[derive(Serialize)]
struct JsonManifest<'a> {
    path: String,
    dialect: Dialect,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    modified: bool,
    results: &'a [UpdateResult],
}

impl JsonSummary {
    fn from_report(report: &CheckReport) -> Self {
        Self {
            manifests: report.files_processed(),
            dependencies: report.total_dependencies(),
            outdated: report.count(Status::Outdated),
            up_to_date: report.count(Status::UpToDate),
            unknown: report.count(Status::Unknown),
            failed: report.count(Status::Failed),
            modified: report.files_modified(),
        }
    }
}

impl<'a> From<&'a ManifestReport> for JsonManifest<'a> {
    fn from(manifest: &'a ManifestReport) -> Self {
        Self {
            path: manifest.path.display().to_string(),
            dialect: manifest.dialect,
            error: manifest.error.as_deref(),
            modified: manifest.modified,
            results: &manifest.results,
        }
    }
}

fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let report = &result.report;
        let output = JsonOutput {
            checked_at: report.checked_at,
            summary: JsonSummary::from_report(report),
            manifests: report.manifests.iter().map(JsonManifest::from).collect(),
        };
        write_json(&output, writer)
    }

    fn format_summary(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        write_json(&JsonSummary::from_report(report), writer)
    }
}
