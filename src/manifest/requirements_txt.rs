//! requirements.txt parser for pip projects
//!
//! Handles:
//! - `name==1.0`, `name[extra]>=1.0`, `name ~= 1.4, != 1.4.3`
//! - inline and whole-line `#` comments
//! - environment markers after `;` (kept when rewriting)
//! - direct references `name @ url`
//! - unlisted operators (`numpy<2`, `django>3.2`), kept as unconstrained
//!
//! Option lines (`-r`, `-e`, `--index-url`, ...) are skipped.

use crate::domain::{Constraint, Dialect, PackageDeclaration, RegistryKind, UpdateResult};
use crate::error::ManifestError;
use crate::parser::{self, pip};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use tracing::warn;

// Distribution name with optional extras; the specifier starts where this ends
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9._-]+)\s*(?:\[[A-Za-z0-9._,\s-]*\])?\s*").unwrap()
});

/// Characters a version specifier can start with
const SPECIFIER_START: [char; 5] = ['<', '>', '=', '!', '~'];

/// A requirement line split into its parts
struct RequirementLine<'a> {
    name: &'a str,
    /// Byte range of the specifier within the line
    specifier: Range<usize>,
    direct_reference: bool,
}

/// Parse declarations from requirements.txt content
pub fn parse(content: &str) -> Result<Vec<PackageDeclaration>, ManifestError> {
    let mut declarations = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let number = index + 1;
        let Some(requirement) = split_line(line, number)? else {
            continue;
        };

        let declared = line[requirement.specifier.clone()].trim();
        let constraint = if requirement.direct_reference {
            Constraint::Unconstrained
        } else {
            pip::parse_constraint(declared).unwrap_or_else(|e| {
                warn!(
                    line = number,
                    package = requirement.name,
                    error = %e,
                    "unparseable version, treating as unconstrained"
                );
                Constraint::Unconstrained
            })
        };

        declarations.push(PackageDeclaration::production(
            requirement.name,
            constraint,
            declared,
            RegistryKind::Pip,
        ));
    }

    Ok(declarations)
}

/// Rewrite outdated requirements, leaving every other byte untouched
pub fn update(content: &str, results: &[UpdateResult]) -> Result<String, ManifestError> {
    let mut output = String::with_capacity(content.len());

    for (index, raw_line) in content.split_inclusive('\n').enumerate() {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let ending = &raw_line[line.len()..];

        let rewritten = match split_line(line, index + 1)? {
            Some(requirement) if !requirement.direct_reference => {
                rewrite_line(line, &requirement, results)
            }
            _ => None,
        };

        output.push_str(rewritten.as_deref().unwrap_or(line));
        output.push_str(ending);
    }

    Ok(output)
}

fn rewrite_line(
    line: &str,
    requirement: &RequirementLine<'_>,
    results: &[UpdateResult],
) -> Option<String> {
    let specifier = &line[requirement.specifier.clone()];
    let target = results
        .iter()
        .filter(|r| r.package == requirement.name && r.declared == specifier.trim())
        .find_map(|r| r.upgrade_target())?;
    let updated = parser::rewrite_constraint(Dialect::Pip, specifier, target)?;

    Some(format!(
        "{}{}{}",
        &line[..requirement.specifier.start],
        updated,
        &line[requirement.specifier.end..]
    ))
}

/// Splits a line into name and specifier; `None` for non-package lines
fn split_line(line: &str, number: usize) -> Result<Option<RequirementLine<'_>>, ManifestError> {
    let without_comment = strip_comment(line);
    let requirement = match without_comment.find(';') {
        Some(marker) => &without_comment[..marker],
        None => without_comment,
    };

    let trimmed = requirement.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Ok(None);
    }

    let malformed =
        || ManifestError::malformed_line(number, format!("invalid requirement '{}'", trimmed));
    let caps = NAME_RE.captures(requirement).ok_or_else(malformed)?;
    let name = caps.get(1).ok_or_else(malformed)?.as_str();
    let name_end = caps.get(0).map_or(0, |m| m.end());

    // Unlisted operators (`<`, `>`, `===`) are left to the constraint parser
    let rest = &requirement[name_end..];
    let direct_reference = rest.starts_with('@');
    if !direct_reference && !rest.is_empty() && !rest.starts_with(SPECIFIER_START) {
        return Err(malformed());
    }

    Ok(Some(RequirementLine {
        name,
        specifier: name_end..requirement.len(),
        direct_reference,
    }))
}

/// Strips a `#` comment that starts the line or follows whitespace
fn strip_comment(line: &str) -> &str {
    let mut after_whitespace = true;
    for (index, c) in line.char_indices() {
        if c == '#' && after_whitespace {
            return &line[..index];
        }
        after_whitespace = c.is_whitespace();
    }
    line
}
