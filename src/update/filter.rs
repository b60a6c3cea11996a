//! Declaration filter configuration
//!
//! This module provides the UpdateFilter struct that encapsulates
//! the `--dialect`, `--only` and `--exclude` options.

use crate::domain::{Dialect, PackageDeclaration};

/// Filter applied to declarations before any lookup
#[derive(Debug, Clone, Default)]
pub struct UpdateFilter {
    /// Dialects to process (empty means all)
    pub dialects: Vec<Dialect>,
    /// Packages to leave out
    pub exclude: Vec<String>,
    /// If non-empty, only check these packages
    pub only: Vec<String>,
}

impl UpdateFilter {
    /// Create a new UpdateFilter with default settings (process all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dialects to process
    pub fn with_dialects(mut self, dialects: Vec<Dialect>) -> Self {
        self.dialects = dialects;
        self
    }

    /// Set packages to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set packages to include (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Check if a dialect should be processed
    pub fn should_process_dialect(&self, dialect: Dialect) -> bool {
        self.dialects.is_empty() || self.dialects.contains(&dialect)
    }

    /// Check if a declaration passes the package filters
    ///
    /// Names are matched under the declaration's registry rules, so
    /// `--only React` selects the npm package `react`.
    pub fn should_process(&self, declaration: &PackageDeclaration) -> bool {
        if !self.only.is_empty() {
            return self.only.iter().any(|p| declaration.same_package(p));
        }
        !self.exclude.iter().any(|p| declaration.same_package(p))
    }

    /// Keep the declarations that pass the package filters
    pub fn apply(&self, declarations: Vec<PackageDeclaration>) -> Vec<PackageDeclaration> {
        declarations
            .into_iter()
            .filter(|d| self.should_process(d))
            .collect()
    }

    /// Returns true if no filter is set
    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty() && self.exclude.is_empty() && self.only.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, RegistryKind};

    fn npm(name: &str) -> PackageDeclaration {
        PackageDeclaration::production(name, Constraint::Unconstrained, "*", RegistryKind::Npm)
    }

    fn pip(name: &str) -> PackageDeclaration {
        PackageDeclaration::production(name, Constraint::Unconstrained, "", RegistryKind::Pip)
    }

    #[test]
    fn test_new_filter() {
        let filter = UpdateFilter::new();
        assert!(filter.dialects.is_empty());
        assert!(filter.exclude.is_empty());
        assert!(filter.only.is_empty());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_should_process_dialect_no_filter() {
        let filter = UpdateFilter::new();
        assert!(filter.should_process_dialect(Dialect::Pip));
        assert!(filter.should_process_dialect(Dialect::Npm));
    }

    #[test]
    fn test_should_process_dialect_with_filter() {
        let filter = UpdateFilter::new().with_dialects(vec![Dialect::Pip]);
        assert!(filter.should_process_dialect(Dialect::Pip));
        assert!(!filter.should_process_dialect(Dialect::Npm));
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_should_process_no_filter() {
        let filter = UpdateFilter::new();
        assert!(filter.should_process(&npm("react")));
        assert!(filter.should_process(&pip("requests")));
    }

    #[test]
    fn test_exclude() {
        let filter = UpdateFilter::new().with_exclude(vec!["lodash".to_string()]);
        assert!(!filter.should_process(&npm("lodash")));
        assert!(filter.should_process(&npm("react")));
    }

    #[test]
    fn test_only() {
        let filter = UpdateFilter::new().with_only(vec!["react".to_string()]);
        assert!(filter.should_process(&npm("react")));
        assert!(!filter.should_process(&npm("lodash")));
    }

    #[test]
    fn test_only_takes_precedence_over_exclude() {
        let filter = UpdateFilter::new()
            .with_only(vec!["react".to_string()])
            .with_exclude(vec!["react".to_string()]);
        assert!(filter.should_process(&npm("react")));
    }

    #[test]
    fn test_npm_names_match_case_insensitively() {
        let filter = UpdateFilter::new().with_only(vec!["React".to_string()]);
        assert!(filter.should_process(&npm("react")));
    }

    #[test]
    fn test_pip_names_match_exactly() {
        let filter = UpdateFilter::new().with_exclude(vec!["Django".to_string()]);
        assert!(filter.should_process(&pip("django")));
        assert!(!filter.should_process(&pip("Django")));
    }

    #[test]
    fn test_apply_preserves_order() {
        let filter = UpdateFilter::new().with_exclude(vec!["b".to_string()]);
        let kept = filter.apply(vec![npm("a"), npm("b"), npm("c")]);
        let names: Vec<_> = kept.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }
}
