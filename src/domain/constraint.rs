//! Declared version constraints

use super::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A constraint on acceptable versions of a package
///
/// Every variant except `Unconstrained` carries exactly one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "version", rename_all = "snake_case")]
pub enum Constraint {
    /// Exactly this version (`==1.2.3`, `1.2.3`)
    Exact(Version),
    /// This version or newer (`>=1.2.3`)
    AtLeast(Version),
    /// This version or older (`<=1.2.3`)
    AtMost(Version),
    /// Same major.minor, not older (`~=1.2.3`, `~1.2.3`)
    Compatible(Version),
    /// Same left-most non-zero segment, not older (`^1.2.3`)
    Caret(Version),
    /// Anything but this version (`!=1.2.3`)
    Excluded(Version),
    /// No version requirement
    Unconstrained,
}

impl Constraint {
    /// Returns the version this constraint is anchored on
    ///
    /// `Excluded` and `Unconstrained` say nothing about the version in use
    /// and return `None`.
    pub fn reference(&self) -> Option<&Version> {
        match self {
            Constraint::Exact(v)
            | Constraint::AtLeast(v)
            | Constraint::AtMost(v)
            | Constraint::Compatible(v)
            | Constraint::Caret(v) => Some(v),
            Constraint::Excluded(_) | Constraint::Unconstrained => None,
        }
    }

    /// Returns a short name for the constraint kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Constraint::Exact(_) => "exact",
            Constraint::AtLeast(_) => "at_least",
            Constraint::AtMost(_) => "at_most",
            Constraint::Compatible(_) => "compatible",
            Constraint::Caret(_) => "caret",
            Constraint::Excluded(_) => "excluded",
            Constraint::Unconstrained => "unconstrained",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Exact(v) => write!(f, "=={}", v),
            Constraint::AtLeast(v) => write!(f, ">={}", v),
            Constraint::AtMost(v) => write!(f, "<={}", v),
            Constraint::Compatible(v) => write!(f, "~={}", v),
            Constraint::Caret(v) => write!(f, "^{}", v),
            Constraint::Excluded(v) => write!(f, "!={}", v),
            Constraint::Unconstrained => write!(f, "*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn test_reference() {
        assert_eq!(Constraint::Exact(v("1.0")).reference(), Some(&v("1.0")));
        assert_eq!(Constraint::AtLeast(v("2.0")).reference(), Some(&v("2.0")));
        assert_eq!(Constraint::AtMost(v("3.0")).reference(), Some(&v("3.0")));
        assert_eq!(
            Constraint::Compatible(v("1.4")).reference(),
            Some(&v("1.4"))
        );
        assert_eq!(Constraint::Caret(v("0.2.1")).reference(), Some(&v("0.2.1")));
        assert_eq!(Constraint::Excluded(v("1.0")).reference(), None);
        assert_eq!(Constraint::Unconstrained.reference(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Constraint::Exact(v("1.0")).to_string(), "==1.0");
        assert_eq!(Constraint::Caret(v("1.2.3")).to_string(), "^1.2.3");
        assert_eq!(Constraint::Unconstrained.to_string(), "*");
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Constraint::AtLeast(v("13.0.0"))).unwrap();
        assert_eq!(json, r#"{"op":"at_least","version":"13.0.0"}"#);

        let json = serde_json::to_string(&Constraint::Unconstrained).unwrap();
        assert_eq!(json, r#"{"op":"unconstrained"}"#);
    }
}
