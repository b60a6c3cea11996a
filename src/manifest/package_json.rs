//! package.json parser for npm projects
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use crate::domain::{Dialect, PackageDeclaration, RegistryKind, UpdateResult};
use crate::error::ManifestError;
use crate::parser::{self, npm};
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::ops::Range;

/// Dependency sections and whether they hold development dependencies
const SECTIONS: [(&str, bool); 4] = [
    ("dependencies", false),
    ("devDependencies", true),
    ("peerDependencies", false),
    ("optionalDependencies", false),
];

/// Parse declarations from package.json content
pub fn parse(content: &str) -> Result<Vec<PackageDeclaration>, ManifestError> {
    let json: Value = serde_json::from_str(content)
        .map_err(|e| ManifestError::malformed_line(e.line(), e.to_string()))?;

    let root = json
        .as_object()
        .ok_or_else(|| ManifestError::malformed("expected a JSON object at the top level"))?;

    let mut declarations = Vec::new();
    for (section, is_dev) in SECTIONS {
        if let Some(deps) = root.get(section).and_then(Value::as_object) {
            parse_section(deps, is_dev, &mut declarations);
        }
    }

    Ok(declarations)
}

fn parse_section(deps: &Map<String, Value>, is_dev: bool, output: &mut Vec<PackageDeclaration>) {
    for (name, value) in deps {
        if let Some(range) = value.as_str() {
            output.push(PackageDeclaration::new(
                name.clone(),
                npm::parse_constraint(range),
                range,
                is_dev,
                RegistryKind::Npm,
            ));
        }
    }
}

/// Rewrite outdated ranges in place
///
/// Uses text replacement rather than re-serializing so that key order,
/// indentation and spacing survive untouched. Only the four dependency
/// sections are touched; `overrides`, `resolutions` and the like keep
/// their ranges.
pub fn update(content: &str, results: &[UpdateResult]) -> Result<String, ManifestError> {
    parse(content)?;

    let mut updated = content.to_string();
    // Back to front so earlier spans stay valid
    for span in section_spans(content).into_iter().rev() {
        let section = rewrite_section(&content[span.clone()], results)?;
        updated.replace_range(span, &section);
    }

    Ok(updated)
}

fn rewrite_section(section: &str, results: &[UpdateResult]) -> Result<String, ManifestError> {
    let mut updated = section.to_string();
    for result in results {
        let Some(target) = result.upgrade_target() else {
            continue;
        };

        // "name" : "range" with flexible whitespace
        let pattern = format!(r#"("{}"\s*:\s*")([^"]*)(")"#, regex::escape(&result.package));
        let re = Regex::new(&pattern).map_err(|e| {
            ManifestError::malformed(format!("cannot locate '{}': {}", result.package, e))
        })?;

        updated = re
            .replace_all(&updated, |caps: &Captures| {
                let rewritten = (caps[2] == result.declared)
                    .then(|| parser::rewrite_constraint(Dialect::Npm, &caps[2], target))
                    .flatten();
                match rewritten {
                    Some(range) => format!("{}{}{}", &caps[1], range, &caps[3]),
                    None => caps[0].to_string(),
                }
            })
            .into_owned();
    }
    Ok(updated)
}

/// Byte ranges of the top-level dependency section objects
///
/// Expects content that already parsed as JSON.
fn section_spans(content: &str) -> Vec<Range<usize>> {
    let bytes = content.as_bytes();
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut last_key: Option<Range<usize>> = None;
    let mut open: Option<usize> = None;

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let start = i + 1;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if depth == 1 {
                    last_key = Some(start..i.min(bytes.len()));
                }
            }
            b'{' | b'[' => {
                depth += 1;
                let key = last_key.take();
                if depth == 2 && bytes[i] == b'{' {
                    let is_section = key.is_some_and(|key| {
                        SECTIONS.iter().any(|(section, _)| *section == &content[key.clone()])
                    });
                    if is_section {
                        open = Some(i);
                    }
                }
            }
            b'}' | b']' => {
                if depth == 2 {
                    if let Some(start) = open.take() {
                        spans.push(start..i + 1);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        i += 1;
    }

    spans
}
