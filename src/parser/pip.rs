//! pip requirement specifier parser
//!
//! Handles specifier formats:
//! - Exact: `==1.2.3`
//! - Compatible release: `~=1.2.3`
//! - Comparison: `>=1.2.3`, `<=1.2.3`
//! - Exclusion: `!=1.2.3`
//! - Lists: `>=1.0,<2.0` (the first clause decides)
//!
//! Anything else, including an empty specifier, is unconstrained.

use crate::domain::{Constraint, Version};
use crate::error::VersionError;
use pep508_rs::pep440_rs::Version as Pep440Version;
use regex::Regex;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

static CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(==|~=|>=|<=|!=)\s*([^\s,]*)\s*$").unwrap());

fn first_clause(specifier: &str) -> &str {
    specifier.split(',').next().unwrap_or_default()
}

/// Parses a specifier such as `>=13.0.0`
///
/// Fails when an operator is present but the version after it is not a
/// valid version (`==latest`, `==1.4.*`).
pub fn parse_constraint(specifier: &str) -> Result<Constraint, VersionError> {
    let Some(caps) = CLAUSE_RE.captures(first_clause(specifier)) else {
        return Ok(Constraint::Unconstrained);
    };
    let version = parse_version(&caps[2])?;

    Ok(match &caps[1] {
        "==" => Constraint::Exact(version),
        ">=" => Constraint::AtLeast(version),
        "<=" => Constraint::AtMost(version),
        "~=" => Constraint::Compatible(version),
        _ => Constraint::Excluded(version),
    })
}

/// Parses a version the way PyPI normalizes it (`1.0-1`, `2.0.0-RC.2`)
///
/// Text that is not valid PEP 440 goes through the generic parser.
pub fn parse_version(text: &str) -> Result<Version, VersionError> {
    match Pep440Version::from_str(text.trim()) {
        Ok(parsed) => Ok(Version::from_pep440(text, &parsed)),
        Err(_) => Version::parse(text),
    }
}

/// Returns the byte range of the version in the first clause
pub fn version_span(specifier: &str) -> Option<Range<usize>> {
    CLAUSE_RE
        .captures(first_clause(specifier))
        .and_then(|caps| caps.get(2))
        .filter(|m| !m.is_empty())
        .map(|m| m.range())
}
