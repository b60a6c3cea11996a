//! Diff output formatter for showing manifest rewrites
//!
//! Rewrites only ever change text inside a line, so the diff pairs lines
//! by position and emits one hunk per changed line.

use crate::domain::{CheckReport, Status};
use crate::manifest::WriteResult;
use crate::orchestrator::OrchestratorResult;
use crate::output::OutputFormatter;
use std::io::Write;

/// Diff formatter for showing version changes
pub struct DiffFormatter {
    /// Whether the rewrites were applied on disk
    write: bool,
}

impl DiffFormatter {
    /// Create a new diff formatter
    pub fn new(write: bool) -> Self {
        Self { write }
    }

    /// Write one file's changes as unified diff hunks
    fn format_write_result(
        &self,
        result: &WriteResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if !result.has_changes() {
            return Ok(());
        }

        writeln!(writer, "--- a/{}", result.path.display())?;
        writeln!(writer, "+++ b/{}", result.path.display())?;

        for (index, (old, new)) in result.original.lines().zip(result.updated.lines()).enumerate() {
            if old != new {
                let line = index + 1;
                writeln!(writer, "@@ -{},1 +{},1 @@", line, line)?;
                writeln!(writer, "-{}", old)?;
                writeln!(writer, "+{}", new)?;
            }
        }

        Ok(())
    }
}

impl OutputFormatter for DiffFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        for write_result in &result.write_results {
            self.format_write_result(write_result, writer)?;
        }

        self.format_summary(&result.report, writer)
    }

    fn format_summary(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let outdated = report.count(Status::Outdated);
        let failed = report.count(Status::Failed);
        let verb = if self.write { "updated" } else { "would be updated" };

        writeln!(
            writer,
            "# {} package(s) {}, {} failed",
            outdated, verb, failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_result(original: &str, updated: &str) -> WriteResult {
        WriteResult {
            path: PathBuf::from("requirements.txt"),
            original: original.to_string(),
            updated: updated.to_string(),
            file_modified: false,
        }
    }

    fn render(formatter: &DiffFormatter, results: Vec<WriteResult>) -> String {
        let result = OrchestratorResult {
            report: CheckReport::new(),
            write_results: results,
        };
        let mut output = Vec::new();
        formatter.format(&result, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_diff_changed_lines_only() {
        let output = render(
            &DiffFormatter::new(false),
            vec![write_result(
                "# deps\nrequests==2.31.0\nrich>=13.0.0\n",
                "# deps\nrequests==2.32.3\nrich>=13.0.0\n",
            )],
        );

        assert!(output.contains("--- a/requirements.txt\n+++ b/requirements.txt\n"));
        assert!(output.contains("@@ -2,1 +2,1 @@\n-requests==2.31.0\n+requests==2.32.3\n"));
        assert!(!output.contains("-rich"));
        assert!(!output.contains("# deps"));
    }

    #[test]
    fn test_diff_skips_unchanged_files() {
        let output = render(
            &DiffFormatter::new(false),
            vec![write_result("requests==2.32.3\n", "requests==2.32.3\n")],
        );
        assert!(!output.contains("---"));
    }

    #[test]
    fn test_diff_summary_wording() {
        let dry = render(&DiffFormatter::new(false), Vec::new());
        assert_eq!(dry, "# 0 package(s) would be updated, 0 failed\n");

        let applied = render(&DiffFormatter::new(true), Vec::new());
        assert_eq!(applied, "# 0 package(s) updated, 0 failed\n");
    }
}
