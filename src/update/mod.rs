//! Update judgment logic for dependencies
//!
//! This module provides:
//! - Constraint evaluation (`satisfies`, `is_outdated`)
//! - Declaration filter configuration from CLI args
//! - Update judgment that turns a registry lookup into an `UpdateResult`

mod filter;

pub use filter::UpdateFilter;

use crate::domain::{Constraint, PackageDeclaration, UpdateResult, Version};
use crate::error::RegistryError;

/// Returns true if `candidate` is acceptable under `constraint`
pub fn satisfies(constraint: &Constraint, candidate: &Version) -> bool {
    match constraint {
        Constraint::Exact(v) => candidate == v,
        Constraint::AtLeast(v) => candidate >= v,
        Constraint::AtMost(v) => candidate <= v,
        Constraint::Excluded(v) => candidate != v,
        Constraint::Unconstrained => true,
        Constraint::Compatible(v) => {
            let locked = if v.release().len() > 1 { 2 } else { 1 };
            candidate >= v && shares_prefix(candidate, v, locked)
        }
        Constraint::Caret(v) => candidate >= v && shares_prefix(candidate, v, caret_lock(v)),
    }
}

/// Number of leading segments a caret range keeps fixed
///
/// Everything up to and including the first non-zero segment; all of them
/// for `0.0.0`.
fn caret_lock(version: &Version) -> usize {
    let release = version.release();
    release
        .iter()
        .position(|&segment| segment != 0)
        .map_or(release.len(), |index| index + 1)
}

fn shares_prefix(candidate: &Version, reference: &Version, segments: usize) -> bool {
    (0..segments).all(|i| candidate.segment(i) == reference.segment(i))
}

/// Decide whether `latest` supersedes the version in use
///
/// Returns `None` when nothing is known about the version in use.
pub fn is_outdated(current: Option<&Version>, latest: &Version) -> Option<bool> {
    current.map(|current| latest > current)
}

/// Turns registry lookups into results
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateJudge;

impl UpdateJudge {
    /// Create a new UpdateJudge
    pub fn new() -> Self {
        Self
    }

    /// Judge a declaration against the outcome of its latest-version lookup
    pub fn judge(
        &self,
        declaration: &PackageDeclaration,
        lookup: Result<Version, RegistryError>,
    ) -> UpdateResult {
        match lookup {
            Ok(latest) => {
                let current = declaration.reference().cloned();
                let outdated = is_outdated(current.as_ref(), &latest);
                UpdateResult::checked(declaration, current, latest, outdated)
            }
            Err(e) => UpdateResult::failed(declaration, e.kind()).with_retry_after(e.retry_after()),
        }
    }
}
