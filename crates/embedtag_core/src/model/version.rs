//! Plugin version triple.
//!
//! # Responsibility
//! - Parse loosely formatted version text into `major.minor.revision`.
//! - Answer "is the installed version at least the required one".
//!
//! # Invariants
//! - Parsing never fails: missing or unparsable components become `0`.
//! - Ordering is lexicographic on `(major, minor, revision)`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DESCRIPTION_WORDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z]|[A-Z]|\s)+").expect("valid description words regex"));
static DESCRIPTION_BUILD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s+r|\s+b[0-9]+)").expect("valid description build regex"));

/// Three-component version used for plugin capability gating.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub struct VersionTriple {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

/// Lowest Flash player able to run the express-install upgrade flow.
pub const EXPRESS_INSTALL_MIN_VERSION: VersionTriple = VersionTriple::new(6, 0, 65);

impl VersionTriple {
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Builds a triple from textual components; extra components are ignored.
    pub fn from_parts<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut iter = parts.into_iter();
        let mut next = || iter.next().map(leading_number).unwrap_or(0);
        let major = next();
        let minor = next();
        let revision = next();
        Self::new(major, minor, revision)
    }

    /// Parses dotted text such as `9.0.115`.
    pub fn parse(value: &str) -> Self {
        Self::from_parts(value.split('.'))
    }

    /// Parses a browser plugin description such as `Shockwave Flash 9.0 r28`.
    ///
    /// The first run of letters/whitespace is dropped and the first build
    /// marker (` r` or ` b<digits>`) becomes the revision separator.
    pub fn from_plugin_description(description: &str) -> Self {
        let stripped = DESCRIPTION_WORDS_RE.replace(description, "");
        let dotted = DESCRIPTION_BUILD_RE.replace(&stripped, ".");
        Self::parse(&dotted)
    }

    /// Parses an ActiveX `$version` string such as `WIN 9,0,28,0`.
    ///
    /// Returns `None` when the platform token is not followed by a version.
    pub fn from_activex_version(value: &str) -> Option<Self> {
        let numbers = value.split(' ').nth(1)?;
        Some(Self::from_parts(numbers.split(',')))
    }

    /// Returns whether `self` satisfies `required`.
    ///
    /// Only the lowest compared level uses `>=`; a higher level decides as
    /// soon as it differs.
    pub fn is_at_least(&self, required: &VersionTriple) -> bool {
        if self.major != required.major {
            return self.major > required.major;
        }
        if self.minor != required.minor {
            return self.minor > required.minor;
        }
        self.revision >= required.revision
    }
}

impl Display for VersionTriple {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for VersionTriple {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for VersionTriple {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<VersionTriple> for String {
    fn from(value: VersionTriple) -> Self {
        value.to_string()
    }
}

impl From<(u32, u32, u32)> for VersionTriple {
    fn from((major, minor, revision): (u32, u32, u32)) -> Self {
        Self::new(major, minor, revision)
    }
}

/// Reads the leading decimal digits of a component, after leading whitespace.
///
/// A component with no leading digits (including a signed one) reads as `0`.
fn leading_number(component: &str) -> u32 {
    component
        .trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u32, |acc, digit| acc.saturating_mul(10).saturating_add(digit))
}
