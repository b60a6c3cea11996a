//! Version model shared by both registries
//!
//! A version is an optional epoch, numeric release segments, and optional
//! pre-release, post-release, development and local labels. Ordering follows
//! PEP 440, which agrees with semver for the shapes npm publishes:
//! - epoch first, then release segments numerically, missing segments count as zero
//! - a development-only release sorts below every pre-release of the same segments
//! - a pre-release sorts below the release, a post-release above it
//! - a development label sorts below the same version without one
//! - a local label sorts above the same version without one
//!
//! The original text is kept for display only and does not take part in
//! comparisons.

use crate::error::VersionError;
use pep508_rs::pep440_rs::{self, PrereleaseKind};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// pre, post and dev suffixes after the release, each optional
static SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[-_.]?(?P<pre>(?:alpha|beta|preview|pre|rc|a|b|c)[-_.]?\d*))?(?:[-_.]?(?:post|rev|r)[-_.]?(?P<post>\d*))?(?:[-_.]?dev[-_.]?(?P<dev>\d*))?$",
    )
    .unwrap()
});

// Free-form label such as `-next.3` or `.x`
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-.]([0-9A-Za-z][0-9A-Za-z._-]*)$").unwrap());

/// A parsed package version
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    epoch: u64,
    release: Vec<u64>,
    pre: Option<String>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

/// One comparable piece of a pre-release or local label
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Identifier {
    Numeric(u64),
    Text(String),
}

impl Version {
    /// Parses a version string such as `1.2.3`, `v2.0`, `1.0.0-rc.1`, `5.0a1`
    /// or `1.0.post1`
    ///
    /// Fails only when the text does not start with a numeric segment, or
    /// when what follows the release is not a label.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::invalid(text);
        let trimmed = text.trim();
        let body = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

        let (epoch, body) = match body.split_once('!') {
            Some((epoch, rest)) => (epoch.parse::<u64>().map_err(|_| invalid())?, rest),
            None => (0, body),
        };
        let (public, local) = match body.split_once('+') {
            Some((public, local)) => (public, non_empty(local)),
            None => (body, None),
        };
        let (release, tail) = split_release(public).ok_or_else(invalid)?;

        let mut version = Self {
            raw: trimmed.to_string(),
            epoch,
            release,
            pre: None,
            post: None,
            dev: None,
            local,
        };
        if tail.is_empty() {
            return Ok(version);
        }

        if let Some(caps) = SUFFIX_RE.captures(tail) {
            let number = |name: &str| -> Result<Option<u64>, VersionError> {
                caps.name(name)
                    .map(|m| match m.as_str() {
                        "" => Ok(0),
                        digits => digits.parse::<u64>().map_err(|_| invalid()),
                    })
                    .transpose()
            };
            version.pre = caps.name("pre").map(|m| m.as_str().to_string());
            version.post = number("post")?;
            version.dev = number("dev")?;
        } else if let Some(caps) = LABEL_RE.captures(tail) {
            version.pre = Some(caps[1].to_string());
        } else {
            return Err(invalid());
        }

        Ok(version)
    }

    /// Builds a version from a PEP 440 parse, keeping `text` for display
    pub fn from_pep440(text: &str, parsed: &pep440_rs::Version) -> Self {
        let trimmed = text.trim();
        let pre = parsed.pre().map(|pre| {
            let kind = match pre.kind {
                PrereleaseKind::Alpha => "a",
                PrereleaseKind::Beta => "b",
                PrereleaseKind::Rc => "rc",
            };
            format!("{}{}", kind, pre.number)
        });

        Self {
            raw: trimmed.to_string(),
            epoch: parsed.epoch(),
            release: parsed.release().to_vec(),
            pre,
            post: parsed.post(),
            dev: parsed.dev(),
            local: trimmed.split_once('+').and_then(|(_, local)| non_empty(local)),
        }
    }

    /// Returns the text this version was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the numeric release segments as written
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Returns the release segment at `index`, zero when absent
    pub fn segment(&self, index: usize) -> u64 {
        self.release.get(index).copied().unwrap_or(0)
    }

    /// Returns the pre-release label, if any
    pub fn pre_release(&self) -> Option<&str> {
        self.pre.as_deref()
    }

    /// Returns the local label, if any
    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// Returns the post-release number, if any
    pub fn post_release(&self) -> Option<u64> {
        self.post
    }

    /// Returns the development release number, if any
    pub fn dev_release(&self) -> Option<u64> {
        self.dev
    }

    /// 0 for a development-only release, 1 for a pre-release, 2 otherwise
    fn phase(&self) -> u8 {
        match (&self.pre, self.post, self.dev) {
            (Some(_), _, _) => 1,
            (None, None, Some(_)) => 0,
            _ => 2,
        }
    }

    fn compare_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Reads the leading dotted numeric segments, returning them with the rest
fn split_release(text: &str) -> Option<(Vec<u64>, &str)> {
    let mut release = Vec::new();
    let mut rest = text;
    loop {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            break;
        }
        release.push(rest[..digits].parse::<u64>().ok()?);
        rest = &rest[digits..];
        match rest.strip_prefix('.') {
            Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
            _ => break,
        }
    }
    (!release.is_empty()).then_some((release, rest))
}

fn non_empty(label: &str) -> Option<String> {
    (!label.is_empty()).then(|| label.to_string())
}

/// Splits a label into identifiers on `.`, `-`, `_` and digit/letter boundaries
fn identifiers(label: &str) -> Vec<Identifier> {
    let mut result = Vec::new();
    for part in label.split(['.', '-', '_']).filter(|p| !p.is_empty()) {
        let mut rest = part;
        while let Some(first) = rest.chars().next() {
            let numeric = first.is_ascii_digit();
            let end = rest
                .find(|c: char| c.is_ascii_digit() != numeric)
                .unwrap_or(rest.len());
            let (token, tail) = rest.split_at(end);
            result.push(match token.parse::<u64>() {
                Ok(n) if numeric => Identifier::Numeric(n),
                _ => Identifier::Text(token.to_ascii_lowercase()),
            });
            rest = tail;
        }
    }
    result
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    identifiers(a).cmp(&identifiers(b))
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.compare_release(other))
            .then_with(|| self.phase().cmp(&other.phase()))
            .then_with(|| match (&self.pre, &other.pre) {
                (Some(a), Some(b)) => compare_labels(a, b),
                _ => Ordering::Equal,
            })
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| match (self.dev, other.dev) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(&b),
            })
            .then_with(|| match (&self.local, &other.local) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (Some(a), Some(b)) => compare_labels(a, b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Version::parse(&text).map_err(serde::de::Error::custom)
    }
}
