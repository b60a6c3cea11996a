//! Constraint parsers for the supported manifest dialects
//!
//! This module turns the constraint text of a single declaration into a
//! `Constraint` and locates the version inside it for rewriting:
//! - pip requirement specifiers (`==`, `>=`, `<=`, `~=`, `!=`)
//! - npm ranges (`^`, `~`, `>=`, `<=`, plain versions)

pub mod npm;
pub mod pip;

use crate::domain::{Constraint, Dialect, Version};
use crate::error::VersionError;

/// Parses constraint text written in the given dialect
///
/// Only pip can fail: an operator followed by something that is not a
/// version. npm falls back to `Unconstrained` for anything it does not model.
pub fn parse_constraint(dialect: Dialect, text: &str) -> Result<Constraint, VersionError> {
    match dialect {
        Dialect::Pip => pip::parse_constraint(text),
        Dialect::Npm => Ok(npm::parse_constraint(text)),
    }
}

/// Replaces the version inside constraint text, keeping operator and spacing
///
/// Returns `None` when the text carries no version to replace.
pub fn rewrite_constraint(dialect: Dialect, declared: &str, version: &Version) -> Option<String> {
    let span = match dialect {
        Dialect::Pip => pip::version_span(declared),
        Dialect::Npm => npm::version_span(declared),
    }?;

    let mut updated = String::with_capacity(declared.len() + version.as_str().len());
    updated.push_str(&declared[..span.start]);
    updated.push_str(version.as_str());
    updated.push_str(&declared[span.end..]);
    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn test_parse_constraint_dispatch() {
        assert_eq!(
            parse_constraint(Dialect::Pip, "~=1.4").unwrap(),
            Constraint::Compatible(v("1.4"))
        );
        assert_eq!(
            parse_constraint(Dialect::Npm, "^1.4.0").unwrap(),
            Constraint::Caret(v("1.4.0"))
        );
        assert!(parse_constraint(Dialect::Pip, "==latest").is_err());
        assert_eq!(
            parse_constraint(Dialect::Npm, "latest").unwrap(),
            Constraint::Unconstrained
        );
    }

    #[test]
    fn test_rewrite_constraint_keeps_operator() {
        assert_eq!(
            rewrite_constraint(Dialect::Pip, "==2.31.0", &v("2.32.3")).as_deref(),
            Some("==2.32.3")
        );
        assert_eq!(
            rewrite_constraint(Dialect::Pip, ">= 13.0.0", &v("13.7.1")).as_deref(),
            Some(">= 13.7.1")
        );
        assert_eq!(
            rewrite_constraint(Dialect::Npm, "^18.2.0", &v("19.1.0")).as_deref(),
            Some("^19.1.0")
        );
        assert_eq!(
            rewrite_constraint(Dialect::Npm, "v1.0.0", &v("1.2.0")).as_deref(),
            Some("v1.2.0")
        );
    }

    #[test]
    fn test_rewrite_constraint_first_clause_only() {
        assert_eq!(
            rewrite_constraint(Dialect::Pip, ">=1.0,<3.0", &v("2.1")).as_deref(),
            Some(">=2.1,<3.0")
        );
    }

    #[test]
    fn test_rewrite_constraint_is_idempotent() {
        let once = rewrite_constraint(Dialect::Npm, "~4.17.0", &v("4.17.21")).unwrap();
        let twice = rewrite_constraint(Dialect::Npm, &once, &v("4.17.21")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rewrite_constraint_without_version() {
        assert!(rewrite_constraint(Dialect::Npm, "*", &v("1.0.0")).is_none());
        assert!(rewrite_constraint(Dialect::Pip, "", &v("1.0.0")).is_none());
    }
}
