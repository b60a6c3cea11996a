//! Declared dependency information

use super::{Constraint, RegistryKind, Version};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A package declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDeclaration {
    /// Package name as written
    pub name: String,
    /// Parsed constraint
    pub constraint: Constraint,
    /// Constraint text as written in the manifest
    pub declared: String,
    /// Whether this is a development dependency
    pub is_dev: bool,
    /// Registry this package is resolved against
    pub registry: RegistryKind,
}

impl PackageDeclaration {
    /// Creates a new declaration
    pub fn new(
        name: impl Into<String>,
        constraint: Constraint,
        declared: impl Into<String>,
        is_dev: bool,
        registry: RegistryKind,
    ) -> Self {
        Self {
            name: name.into(),
            constraint,
            declared: declared.into(),
            is_dev,
            registry,
        }
    }

    /// Creates a new production declaration
    pub fn production(
        name: impl Into<String>,
        constraint: Constraint,
        declared: impl Into<String>,
        registry: RegistryKind,
    ) -> Self {
        Self::new(name, constraint, declared, false, registry)
    }

    /// Creates a new development declaration
    pub fn development(
        name: impl Into<String>,
        constraint: Constraint,
        declared: impl Into<String>,
        registry: RegistryKind,
    ) -> Self {
        Self::new(name, constraint, declared, true, registry)
    }

    /// Returns the version the constraint is anchored on, if any
    pub fn reference(&self) -> Option<&Version> {
        self.constraint.reference()
    }

    /// Returns true if `name` refers to the same package under registry rules
    pub fn same_package(&self, name: &str) -> bool {
        self.registry.normalize_name(&self.name) == self.registry.normalize_name(name)
    }
}

impl fmt::Display for PackageDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dev_marker = if self.is_dev { " (dev)" } else { "" };
        let declared = if self.declared.is_empty() {
            "*"
        } else {
            &self.declared
        };
        write!(
            f,
            "{} {}{} [{}]",
            self.name, declared, dev_marker, self.registry
        )
    }
}
