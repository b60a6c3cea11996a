//! npm version range parser
//!
//! Handles version formats:
//! - Caret: `^1.2.3`
//! - Tilde: `~1.2.3`
//! - Comparison: `>=1.2.3`, `<=1.2.3`
//! - Exact: `1.2.3`, `=1.2.3`, `v1.2.3`
//!
//! Everything else (`*`, `latest`, `1.x`, hyphen and `||` ranges, strict
//! `>`/`<`, URLs, `workspace:` and other protocols) is unconstrained.

use crate::domain::{Constraint, Version};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

// Regex patterns for npm version ranges; group 1 is the version
static CARET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\^\s*v?(\d+(?:\.\d+)*(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\s*$").unwrap()
});
static TILDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*~>?\s*v?(\d+(?:\.\d+)*(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\s*$")
        .unwrap()
});
static GTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*>=\s*v?(\d+(?:\.\d+)*(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\s*$").unwrap()
});
static LTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*<=\s*v?(\d+(?:\.\d+)*(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\s*$").unwrap()
});
static EXACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*=?\s*v?(\d+(?:\.\d+)*(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)\s*$").unwrap()
});

type Make = fn(Version) -> Constraint;

fn matchers() -> [(&'static LazyLock<Regex>, Make); 5] {
    [
        (&CARET_RE, Constraint::Caret),
        (&TILDE_RE, Constraint::Compatible),
        (&GTE_RE, Constraint::AtLeast),
        (&LTE_RE, Constraint::AtMost),
        (&EXACT_RE, Constraint::Exact),
    ]
}

fn capture(range: &str) -> Option<(Make, regex::Match<'_>)> {
    matchers().into_iter().find_map(|(re, make)| {
        re.captures(range)
            .and_then(|caps| caps.get(1))
            .map(|m| (make, m))
    })
}

/// Parses an npm range such as `^18.2.0`
pub fn parse_constraint(range: &str) -> Constraint {
    capture(range)
        .and_then(|(make, m)| Version::parse(m.as_str()).ok().map(make))
        .unwrap_or(Constraint::Unconstrained)
}

/// Returns the byte range of the version inside a recognized range
pub fn version_span(range: &str) -> Option<Range<usize>> {
    capture(range).map(|(_, m)| m.range())
}
