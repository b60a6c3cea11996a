//! CLI argument parsing module for depcheck

use crate::domain::Dialect;
use crate::installed::DEFAULT_PYTHON;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Manifest dialect selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// requirements.txt
    Pip,
    /// package.json
    Npm,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Pip => Dialect::Pip,
            DialectArg::Npm => Dialect::Npm,
        }
    }
}

/// Check pip and npm manifests for outdated dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depcheck",
    version,
    about = "Check pip and npm manifests for outdated dependencies"
)]
pub struct CliArgs {
    /// Manifest file or directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Dialect filter
    /// Check only this dialect, or force it for a manifest with an unusual name
    #[arg(long, value_enum)]
    pub dialect: Option<DialectArg>,

    // Package filters
    /// Leave a package out of the check (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Check only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Write option
    /// Rewrite manifests with the latest versions of outdated packages
    #[arg(short, long)]
    pub write: bool,

    // Output options
    /// Output results in JSON format
    #[arg(long, conflicts_with = "diff")]
    pub json: bool,

    /// Show the manifest changes in diff format
    #[arg(long)]
    pub diff: bool,

    // Environment mode
    /// Check the packages installed in a Python environment instead of manifests
    #[arg(long, conflicts_with_all = ["write", "diff", "dialect"])]
    pub installed: bool,

    /// Python interpreter whose packages `--installed` lists (default: python3)
    #[arg(long, value_name = "PATH", requires = "installed")]
    pub python: Option<String>,

    // Lookup tuning
    /// Maximum number of registry lookups in flight
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Seconds a resolved version stays cached
    #[arg(long, value_name = "SECS")]
    pub cache_ttl: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries for transient registry failures
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Deadline for all lookups in seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// PyPI base URL
    #[arg(long, value_name = "URL")]
    pub pypi_url: Option<String>,

    /// npm registry base URL
    #[arg(long, value_name = "URL")]
    pub npm_url: Option<String>,
}

impl CliArgs {
    /// Returns the dialect filter, if any
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect.map(Dialect::from)
    }

    /// Returns the interpreter for `--installed`
    pub fn python(&self) -> &str {
        self.python.as_deref().unwrap_or(DEFAULT_PYTHON)
    }

    /// Returns true if progress should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
