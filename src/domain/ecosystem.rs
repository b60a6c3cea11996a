//! Manifest dialects and the registries they resolve against

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Line-oriented pip requirements (requirements.txt)
    Pip,
    /// JSON package manifest (package.json)
    Npm,
}

/// Registries a package can be looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryKind {
    /// Python Package Index
    Pip,
    /// npm registry
    Npm,
}

impl Dialect {
    /// Returns the conventional manifest filename for this dialect
    pub fn manifest_filename(&self) -> &'static str {
        match self {
            Dialect::Pip => "requirements.txt",
            Dialect::Npm => "package.json",
        }
    }

    /// Returns the display name for this dialect
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Pip => "pip",
            Dialect::Npm => "npm",
        }
    }

    /// Returns the registry that packages of this dialect are resolved against
    pub fn registry(&self) -> RegistryKind {
        match self {
            Dialect::Pip => RegistryKind::Pip,
            Dialect::Npm => RegistryKind::Npm,
        }
    }

    /// Infers the dialect from a file name
    ///
    /// `package.json` is npm; `requirements.txt` and variants such as
    /// `requirements-dev.txt` or `dev-requirements.in` are pip.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name == "package.json" {
            return Some(Dialect::Npm);
        }
        let is_requirements = name.contains("requirements")
            && (name.ends_with(".txt") || name.ends_with(".in"));
        is_requirements.then_some(Dialect::Pip)
    }

    /// Guesses the dialect from content alone
    ///
    /// A document whose first non-blank character is `{` is treated as npm.
    pub fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') => Dialect::Npm,
            _ => Dialect::Pip,
        }
    }

    /// Returns all supported dialects
    pub fn all() -> &'static [Dialect] {
        &[Dialect::Npm, Dialect::Pip]
    }
}

impl RegistryKind {
    /// Returns the registry name used in messages
    pub fn registry_name(&self) -> &'static str {
        match self {
            RegistryKind::Pip => "PyPI",
            RegistryKind::Npm => "npm",
        }
    }

    /// Normalizes a package name for cache lookups
    ///
    /// npm names are case-insensitive; pip names are kept as written.
    pub fn normalize_name(&self, name: &str) -> String {
        match self {
            RegistryKind::Npm => name.to_ascii_lowercase(),
            RegistryKind::Pip => name.to_string(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.registry_name())
    }
}
