//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-manifest tables of outdated and failed packages with colors
//! - Semantic version change type indication (major/minor/patch)
//! - Every package, including up-to-date and unknown ones, in verbose mode
//! - Summary with a breakdown by status and change type

use crate::domain::{CheckReport, ManifestReport, Status, UpdateResult, Version};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn from_versions(old: &Version, new: &Version) -> Self {
        if old.segment(0) != new.segment(0) {
            VersionChangeType::Major
        } else if old.segment(1) != new.segment(1) {
            VersionChangeType::Minor
        } else {
            VersionChangeType::Patch
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether manifests were rewritten
    write: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, write: bool) -> Self {
        Self::with_color(verbosity, write, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, write: bool, color: bool) -> Self {
        Self {
            verbosity,
            write,
            color,
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn shown(&self, result: &UpdateResult) -> bool {
        self.verbosity == Verbosity::Verbose
            || matches!(result.status(), Status::Outdated | Status::Failed)
    }

    /// Format a single result line
    fn format_result_line(
        &self,
        result: &UpdateResult,
        name_width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = format!("{:width$}", result.package, width = name_width);
        let dev = if result.is_dev {
            self.paint(" (dev)", |s| s.dimmed())
        } else {
            String::new()
        };
        let latest = result
            .latest
            .as_ref()
            .map(Version::to_string)
            .unwrap_or_default();

        match (result.status(), &result.current) {
            (Status::Outdated, Some(current)) => {
                let change = VersionChangeType::from_versions(current, result.latest.as_ref().unwrap_or(current));
                let label = if self.color {
                    change.colored_label()
                } else {
                    change.label().to_string()
                };
                let arrow = if self.color { "→" } else { "->" };
                writeln!(
                    writer,
                    "  {} {} {} {} [{}]{}",
                    name,
                    self.paint(&current.to_string(), |s| s.dimmed()),
                    arrow,
                    self.paint(&latest, |s| s.bright_white().bold()),
                    label,
                    dev
                )
            }
            (Status::Failed, _) => {
                let mut kind = result.error.map(|k| k.to_string()).unwrap_or_default();
                if let Some(secs) = result.retry_after_secs {
                    kind.push_str(&format!(" (retry after {}s)", secs));
                }
                let mark = if self.color { "✗" } else { "!" };
                writeln!(
                    writer,
                    "  {} {} {}{}",
                    name,
                    self.paint(mark, |s| s.red()),
                    self.paint(&kind, |s| s.red()),
                    dev
                )
            }
            (Status::Unknown, _) => writeln!(
                writer,
                "  {} {} latest {}{}",
                name,
                self.paint(if result.declared.is_empty() { "*" } else { result.declared.as_str() }, |s| s.dimmed()),
                latest,
                dev
            ),
            (_, current) => {
                let current = current.as_ref().map(Version::to_string).unwrap_or_default();
                writeln!(
                    writer,
                    "  {} {} {}{}",
                    name,
                    self.paint(&current, |s| s.dimmed()),
                    self.paint("(latest)", |s| s.dimmed()),
                    dev
                )
            }
        }
    }

    /// Format one manifest with its visible results
    fn format_manifest(
        &self,
        manifest: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let path_display = manifest.path.display().to_string();

        if let Some(ref error) = manifest.error {
            writeln!(
                writer,
                "{} ({}) {}",
                self.paint(&path_display, |s| s.bold()),
                manifest.dialect,
                self.paint(error, |s| s.red())
            )?;
            if manifest.results.is_empty() {
                writeln!(writer)?;
                return Ok(());
            }
        }

        let visible: Vec<&UpdateResult> =
            manifest.results.iter().filter(|r| self.shown(r)).collect();
        if visible.is_empty() {
            return Ok(());
        }

        let outdated = manifest.count(Status::Outdated);
        let failed = manifest.count(Status::Failed);
        let modified = if manifest.modified {
            self.paint(" (updated)", |s| s.cyan())
        } else {
            String::new()
        };
        writeln!(
            writer,
            "{} ({}) {} outdated, {} failed{}",
            self.paint(&path_display, |s| s.bold()),
            manifest.dialect,
            self.paint(&outdated.to_string(), |s| s.yellow()),
            self.paint(&failed.to_string(), |s| s.red()),
            modified
        )?;

        let name_width = visible
            .iter()
            .map(|r| r.package.len())
            .max()
            .unwrap_or(0)
            .max(20);

        // Production first, then dev
        let (prod, dev): (Vec<&UpdateResult>, Vec<&UpdateResult>) =
            visible.into_iter().partition(|r| !r.is_dev);
        for result in prod.into_iter().chain(dev) {
            self.format_result_line(result, name_width, writer)?;
        }

        writeln!(writer)?;
        Ok(())
    }

    /// Count outdated packages by change type
    fn count_by_change_type(&self, report: &CheckReport) -> (usize, usize, usize) {
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;

        for manifest in &report.manifests {
            for result in manifest.outdated() {
                if let (Some(current), Some(latest)) = (&result.current, &result.latest) {
                    match VersionChangeType::from_versions(current, latest) {
                        VersionChangeType::Major => major += 1,
                        VersionChangeType::Minor => minor += 1,
                        VersionChangeType::Patch => patch += 1,
                    }
                }
            }
        }

        (major, minor, patch)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity != Verbosity::Quiet {
            for manifest in &result.report.manifests {
                self.format_manifest(manifest, writer)?;
            }
        }

        self.format_summary(&result.report, writer)
    }

    fn format_summary(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let outdated = report.count(Status::Outdated);
        let failed = report.count(Status::Failed);

        if self.verbosity == Verbosity::Quiet {
            if outdated > 0 {
                writeln!(
                    writer,
                    "{} outdated",
                    self.paint(&outdated.to_string(), |s| s.yellow())
                )?;
            } else {
                writeln!(writer, "{}", self.paint("All up to date", |s| s.dimmed()))?;
            }
            return Ok(());
        }

        writeln!(writer, "{}:", self.paint("Summary", |s| s.bold()))?;
        writeln!(
            writer,
            "  {} manifest(s), {} package(s) checked",
            report.files_processed(),
            report.total_dependencies()
        )?;

        if outdated > 0 {
            let (major, minor, patch) = self.count_by_change_type(report);
            let mut parts = Vec::new();
            if major > 0 {
                parts.push(format!("{} major", self.paint(&major.to_string(), |s| s.red())));
            }
            if minor > 0 {
                parts.push(format!("{} minor", self.paint(&minor.to_string(), |s| s.yellow())));
            }
            if patch > 0 {
                parts.push(format!("{} patch", self.paint(&patch.to_string(), |s| s.green())));
            }
            writeln!(
                writer,
                "  {} outdated ({})",
                self.paint(&outdated.to_string(), |s| s.yellow()),
                parts.join(", ")
            )?;
        } else {
            writeln!(writer, "  {}", self.paint("No outdated packages", |s| s.dimmed()))?;
        }

        let up_to_date = report.count(Status::UpToDate);
        let unknown = report.count(Status::Unknown);
        writeln!(writer, "  {} up to date, {} unknown", up_to_date, unknown)?;
        if failed > 0 {
            writeln!(
                writer,
                "  {} failed",
                self.paint(&failed.to_string(), |s| s.red())
            )?;
        }

        let unparsed = report.manifests.iter().filter(|m| m.results.is_empty() && m.error.is_some()).count();
        if unparsed > 0 {
            writeln!(
                writer,
                "  {} manifest(s) could not be parsed",
                self.paint(&unparsed.to_string(), |s| s.red())
            )?;
        }

        if self.write {
            writeln!(writer, "  {} manifest(s) updated", report.files_modified())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dialect, ErrorKind};
    use std::path::PathBuf;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    fn result(package: &str, current: Option<&str>, latest: Option<&str>, is_dev: bool) -> UpdateResult {
        let current = current.map(v);
        let latest = latest.map(v);
        let outdated = matches!((&current, &latest), (Some(c), Some(l)) if l > c);
        UpdateResult {
            package: package.to_string(),
            declared: current.as_ref().map(|c| format!("=={}", c)).unwrap_or_default(),
            current,
            latest,
            is_dev,
            outdated,
            error: None,
            retry_after_secs: None,
        }
    }

    fn create_test_result() -> OrchestratorResult {
        let mut failed = result("ghost", Some("1.0.0"), None, false);
        failed.error = Some(ErrorKind::NotFound);

        let manifest = ManifestReport::new(
            PathBuf::from("requirements.txt"),
            Dialect::Pip,
            vec![
                result("requests", Some("2.31.0"), Some("2.32.3"), false),
                result("pytest", Some("7.4.0"), Some("8.3.4"), true),
                result("rich", Some("13.7.1"), Some("13.7.1"), false),
                result("flask", None, Some("3.1.0"), false),
                failed,
            ],
        );
        let mut report = CheckReport::new();
        report.add_manifest(manifest);

        OrchestratorResult {
            report,
            write_results: Vec::new(),
        }
    }

    fn render(formatter: &TextFormatter) -> String {
        let mut output = Vec::new();
        formatter.format(&create_test_result(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_version_change_type() {
        assert_eq!(
            VersionChangeType::from_versions(&v("1.0.0"), &v("2.0.0")),
            VersionChangeType::Major
        );
        assert_eq!(
            VersionChangeType::from_versions(&v("1.0.0"), &v("1.5.0")),
            VersionChangeType::Minor
        );
        assert_eq!(
            VersionChangeType::from_versions(&v("1.0.0"), &v("1.0.10")),
            VersionChangeType::Patch
        );
    }

    #[test]
    fn test_version_change_type_short_versions() {
        assert_eq!(
            VersionChangeType::from_versions(&v("1"), &v("1.1")),
            VersionChangeType::Minor
        );
        assert_eq!(
            VersionChangeType::from_versions(&v("v1.0"), &v("2")),
            VersionChangeType::Major
        );
    }

    #[test]
    fn test_format_normal() {
        let output = render(&TextFormatter::with_color(Verbosity::Normal, false, false));

        assert!(output.contains("requirements.txt (pip) 2 outdated, 1 failed"));
        assert!(output.contains("requests"));
        assert!(output.contains("2.31.0 -> 2.32.3 [minor]"));
        assert!(output.contains("7.4.0 -> 8.3.4 [major] (dev)"));
        assert!(output.contains("! not found"));
        assert!(!output.contains("rich"));
        assert!(!output.contains("flask"));
    }

    #[test]
    fn test_format_rate_limited_shows_retry_hint() {
        let mut throttled = result("numpy", Some("1.26.4"), None, false);
        throttled.error = Some(ErrorKind::RateLimited);
        throttled.retry_after_secs = Some(60);

        let mut report = CheckReport::new();
        report.add_manifest(ManifestReport::new(
            PathBuf::from("requirements.txt"),
            Dialect::Pip,
            vec![throttled],
        ));
        let result = OrchestratorResult {
            report,
            write_results: Vec::new(),
        };

        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let mut output = Vec::new();
        formatter.format(&result, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("! rate limited (retry after 60s)"));
    }

    #[test]
    fn test_format_dev_after_prod() {
        let output = render(&TextFormatter::with_color(Verbosity::Normal, false, false));
        let requests = output.find("requests").unwrap();
        let pytest = output.find("pytest").unwrap();
        assert!(requests < pytest);
    }

    #[test]
    fn test_format_verbose_shows_everything() {
        let output = render(&TextFormatter::with_color(Verbosity::Verbose, false, false));

        assert!(output.contains("rich"));
        assert!(output.contains("(latest)"));
        assert!(output.contains("flask"));
        assert!(output.contains("* latest 3.1.0"));
    }

    #[test]
    fn test_format_summary() {
        let output = render(&TextFormatter::with_color(Verbosity::Normal, false, false));

        assert!(output.contains("Summary:"));
        assert!(output.contains("1 manifest(s), 5 package(s) checked"));
        assert!(output.contains("2 outdated (1 major, 1 minor)"));
        assert!(output.contains("1 up to date, 1 unknown"));
        assert!(output.contains("1 failed"));
        assert!(!output.contains("updated"));
    }

    #[test]
    fn test_format_quiet() {
        let output = render(&TextFormatter::with_color(Verbosity::Quiet, false, false));
        assert_eq!(output, "2 outdated\n");
    }

    #[test]
    fn test_format_quiet_nothing_outdated() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false, false);
        let mut output = Vec::new();
        formatter.format_summary(&CheckReport::new(), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "All up to date\n");
    }

    #[test]
    fn test_format_parse_failure() {
        let mut report = CheckReport::new();
        report.add_manifest(ManifestReport::failed(
            "package.json",
            Dialect::Npm,
            "malformed manifest at line 1: expected value",
        ));
        let result = OrchestratorResult {
            report,
            write_results: Vec::new(),
        };

        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let mut output = Vec::new();
        formatter.format(&result, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("package.json (npm) malformed manifest at line 1"));
        assert!(output.contains("1 manifest(s) could not be parsed"));
    }

    #[test]
    fn test_format_write_mode() {
        let output = render(&TextFormatter::with_color(Verbosity::Normal, true, false));
        assert!(output.contains("0 manifest(s) updated"));
    }

    #[test]
    fn test_format_with_colors_does_not_panic() {
        let output = render(&TextFormatter::new(Verbosity::Verbose, true));
        assert!(output.contains("requests"));
    }
}
