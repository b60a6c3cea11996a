//! Check orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: detect → read → parse → reconcile → rewrite
//! - Installed-package mode: `pip list` → reconcile, without rewriting
//! - One bounded lookup batch shared by every manifest
//! - Dry-run rewriting for `--diff`, real rewriting for `--write`
//! - Partial continuation when a manifest cannot be parsed

use crate::cli::CliArgs;
use crate::config::CheckConfig;
use crate::domain::{CheckReport, Dialect, ManifestReport, PackageDeclaration};
use crate::error::{AppError, IoError, ManifestError};
use crate::installed;
use crate::manifest::{self, detect_manifests, read_manifest, ManifestInfo, ManifestWriter, WriteResult};
use crate::progress::Progress;
use crate::reconciler::Reconciler;
use crate::registry::{HttpFetcher, RegistryClient, VersionCache, DEFAULT_USER_AGENT};
use crate::update::UpdateFilter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrator for coordinating the check workflow
pub struct Orchestrator {
    /// CLI arguments for configuration
    args: CliArgs,
    /// Lookup engine
    reconciler: Reconciler,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Per-manifest results
    pub report: CheckReport,
    /// Rewrites computed for manifests with outdated packages
    pub write_results: Vec<WriteResult>,
}

impl OrchestratorResult {
    /// Returns true if any manifest failed to parse or any lookup failed
    pub fn is_partial(&self) -> bool {
        self.report.has_errors()
    }
}

/// A manifest read and parsed, waiting for its lookups
struct ParsedManifest {
    info: ManifestInfo,
    declarations: Result<Vec<PackageDeclaration>, ManifestError>,
}

impl Orchestrator {
    /// Create a new orchestrator wired to the real registries
    pub fn new(args: CliArgs) -> Result<Self, AppError> {
        let config = CheckConfig::resolve(&args)?;
        let reconciler = build_reconciler(&config)?;
        Ok(Self { args, reconciler })
    }

    /// Create an orchestrator with a custom reconciler (for testing)
    pub fn with_reconciler(args: CliArgs, reconciler: Reconciler) -> Self {
        Self { args, reconciler }
    }

    /// Run the check workflow
    pub async fn run(&self) -> Result<OrchestratorResult, AppError> {
        if self.args.installed {
            let mut progress = Progress::new(self.args.show_progress());
            progress.spinner("Listing installed packages...");
            let listing = installed::list_installed(self.args.python()).await;
            progress.finish_and_clear();
            return self.check_installed(&listing?).await;
        }

        let mut progress = Progress::new(self.args.show_progress());
        let filter = self.build_filter();

        // Step 1: Find manifests
        progress.spinner("Detecting manifests...");
        let manifests = self.locate_manifests()?;
        progress.finish_and_clear();
        info!(count = manifests.len(), "manifests found");

        // Step 2: Parse
        let mut parsed = Vec::new();
        for info in manifests {
            let declarations = read_manifest(&info.path)
                .and_then(|content| manifest::parse(info.dialect, &content))
                .map(|declarations| filter.apply(declarations));
            if let Err(ref e) = declarations {
                warn!(path = %info.path.display(), error = %e, "skipping manifest");
            }
            parsed.push(ParsedManifest { info, declarations });
        }

        // Step 3: One batch across all manifests
        let batch: Vec<PackageDeclaration> = parsed
            .iter()
            .filter_map(|m| m.declarations.as_ref().ok())
            .flatten()
            .cloned()
            .collect();
        progress.start(batch.len() as u64, "Checking");
        let mut results = self
            .reconciler
            .check_all_with(&batch, |result| progress.record(result))
            .await
            .into_iter();
        progress.finish_and_clear();

        // Step 4: Split results back per manifest and rewrite
        let writer = ManifestWriter::new(!self.args.write);
        let mut report = CheckReport::new();
        let mut write_results = Vec::new();
        for ParsedManifest { info, declarations } in parsed {
            let declarations = match declarations {
                Ok(declarations) => declarations,
                Err(e) => {
                    report.add_manifest(ManifestReport::failed(&info.path, info.dialect, e.to_string()));
                    continue;
                }
            };

            let manifest_results: Vec<_> = results.by_ref().take(declarations.len()).collect();
            let mut manifest_report = ManifestReport::new(&info.path, info.dialect, manifest_results);

            if manifest_report.has_outdated() && (self.args.write || self.args.diff) {
                match writer.apply(&info.path, info.dialect, &manifest_report.results) {
                    Ok(written) => {
                        manifest_report.modified = written.file_modified;
                        write_results.push(written);
                    }
                    Err(e) => {
                        warn!(path = %info.path.display(), error = %e, "rewrite failed");
                        manifest_report.error = Some(e.to_string());
                    }
                }
            }

            report.add_manifest(manifest_report);
        }

        Ok(OrchestratorResult {
            report,
            write_results,
        })
    }

    /// Check the packages of a `pip list --format=json` listing
    ///
    /// The environment is reported as a single pip manifest named after the
    /// listing command; nothing is rewritten.
    pub async fn check_installed(&self, listing: &str) -> Result<OrchestratorResult, AppError> {
        let declarations = self.build_filter().apply(installed::parse_pip_list(listing)?);
        info!(count = declarations.len(), "installed packages listed");

        let mut progress = Progress::new(self.args.show_progress());
        progress.start(declarations.len() as u64, "Checking");
        let results = self
            .reconciler
            .check_all_with(&declarations, |result| progress.record(result))
            .await;
        progress.finish_and_clear();

        let mut report = CheckReport::new();
        report.add_manifest(ManifestReport::new(
            installed::list_command(self.args.python()),
            Dialect::Pip,
            results,
        ));

        Ok(OrchestratorResult {
            report,
            write_results: Vec::new(),
        })
    }

    /// Build an UpdateFilter from CLI arguments
    fn build_filter(&self) -> UpdateFilter {
        let mut filter = UpdateFilter::new()
            .with_only(self.args.only.clone())
            .with_exclude(self.args.exclude.clone());
        if let Some(dialect) = self.args.dialect() {
            filter = filter.with_dialects(vec![dialect]);
        }
        filter
    }

    /// Resolve the CLI path into manifests to check
    ///
    /// A file is checked as given (`--dialect` forces its dialect); a
    /// directory is scanned and `--dialect` filters what is found.
    fn locate_manifests(&self) -> Result<Vec<ManifestInfo>, AppError> {
        let path = &self.args.path;
        if path.is_file() {
            let dialect = match self.args.dialect() {
                Some(dialect) => dialect,
                None => infer_dialect(path)?,
            };
            return Ok(vec![ManifestInfo::new(path, dialect)]);
        }
        if !path.is_dir() {
            return Err(IoError::not_found(path).into());
        }

        let filter = self.build_filter();
        Ok(detect_manifests(path)
            .into_iter()
            .filter(|m| filter.should_process_dialect(m.dialect))
            .collect())
    }
}

fn infer_dialect(path: &Path) -> Result<Dialect, AppError> {
    if let Some(dialect) = Dialect::from_path(path) {
        return Ok(dialect);
    }
    let content = read_manifest(path)?;
    Ok(Dialect::sniff(&content))
}

/// Wire the HTTP transport, cache and retry policy from settings
pub fn build_reconciler(config: &CheckConfig) -> Result<Reconciler, AppError> {
    let fetcher = HttpFetcher::with_config(config.request_timeout(), DEFAULT_USER_AGENT)?
        .with_base_urls(&config.pypi_url, &config.npm_url);
    let cache = Arc::new(VersionCache::new(config.cache_ttl()));
    let client =
        RegistryClient::new(Arc::new(fetcher), cache).with_retry_policy(config.retry_policy());

    Ok(Reconciler::new(client)
        .with_concurrency(config.concurrency)
        .with_deadline(config.deadline()))
}
