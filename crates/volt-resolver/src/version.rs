//! Semantic Versioning 2.0.0 parsing, precedence, and formatting.
//!
//! Parsing is strict: `MAJOR.MINOR.PATCH[-pre.release][+build]` with no
//! leading zeros in numeric components and no empty identifiers. Precedence
//! follows SemVer §11:
//! - major, minor and patch compare numerically
//! - a version with a pre-release sorts before the same version without one
//! - pre-release identifiers compare left to right: numeric ones by value,
//!   numeric before alphanumeric, alphanumeric ones in ASCII order, and a
//!   shorter list of otherwise equal identifiers sorts first
//!
//! Build metadata is kept for formatting but never affects precedence or
//! equality.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A parsed semantic version. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pre_release: Vec<Identifier>,
    build_metadata: Vec<String>,
}

/// One dot-separated pre-release identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// All digits, no leading zero. Kept as text so arbitrarily long
    /// numbers still compare by value.
    Numeric(String),
    AlphaNumeric(String),
}

/// Returned when a string is not a valid semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("String is not a valid semantic version: '{input}' ({reason})")]
#[diagnostic(
    code(volt::version::invalid),
    help("versions look like MAJOR.MINOR.PATCH[-pre.release][+build], e.g. 1.4.0-rc.1")
)]
pub struct InvalidVersion {
    pub input: String,
    pub reason: String,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: Vec::new(),
            build_metadata: Vec::new(),
        }
    }

    /// Parse a version string against the strict SemVer grammar.
    pub fn parse(input: &str) -> Result<Self, InvalidVersion> {
        let parsed = semver::Version::parse(input).map_err(|e| InvalidVersion {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre_release: split_identifiers(parsed.pre.as_str())
                .map(Identifier::classify)
                .collect(),
            build_metadata: split_identifiers(parsed.build.as_str())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn pre_release(&self) -> &[Identifier] {
        &self.pre_release
    }

    pub fn build_metadata(&self) -> &[String] {
        &self.build_metadata
    }

    pub fn is_pre_release(&self) -> bool {
        !self.pre_release.is_empty()
    }

    /// Whether `self` can stand in for `required`: same major line and strictly newer.
    pub fn is_backward_compatible(&self, required: &Version) -> bool {
        self.major == required.major && required < self
    }

    /// Whether two versions may share one slot in a flattened tree: same
    /// major, and for `0.x` also the same minor.
    pub fn is_api_compatible(&self, other: &Version) -> bool {
        if self.major != other.major {
            return false;
        }
        !(self.major == 0 && self.minor != other.minor)
    }
}

fn split_identifiers(text: &str) -> impl Iterator<Item = &str> {
    text.split('.').filter(|s| !s.is_empty())
}

impl Identifier {
    fn classify(text: &str) -> Self {
        if text.bytes().all(|b| b.is_ascii_digit()) {
            Identifier::Numeric(text.to_string())
        } else {
            Identifier::AlphaNumeric(text.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Numeric(s) | Identifier::AlphaNumeric(s) => s,
        }
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // No leading zeros, so a longer number is a larger one.
            (Identifier::Numeric(a), Identifier::Numeric(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => {
                a.as_bytes().cmp(b.as_bytes())
            }
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| compare_pre_release(&self.pre_release, &other.pre_release))
    }
}

fn compare_pre_release(a: &[Identifier], b: &[Identifier]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        // Slice ordering is pairwise, then shorter-first.
        (false, false) => a.cmp(b),
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

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre_release.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre_release.is_empty() {
            let pre: Vec<&str> = self.pre_release.iter().map(Identifier::as_str).collect();
            write!(f, "-{}", pre.join("."))?;
        }
        if !self.build_metadata.is_empty() {
            write!(f, "+{}", self.build_metadata.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn parses_core_triple() {
        let version = v("1.22.333");
        assert_eq!((version.major, version.minor, version.patch), (1, 22, 333));
        assert!(!version.is_pre_release());
        assert!(version.build_metadata().is_empty());
    }

    #[test]
    fn parses_pre_release_and_build() {
        let version = v("1.0.0-alpha.1+exp.sha.5114f85");
        assert_eq!(
            version.pre_release(),
            &[
                Identifier::AlphaNumeric("alpha".into()),
                Identifier::Numeric("1".into())
            ]
        );
        assert_eq!(version.build_metadata(), &["exp", "sha", "5114f85"]);
    }

    #[test]
    fn build_only() {
        let version = v("1.0.0+20130313144700");
        assert!(!version.is_pre_release());
        assert_eq!(version.build_metadata(), &["20130313144700"]);
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "",
            "1",
            "1.0",
            "1.0.0.0",
            "01.0.0",
            "1.02.0",
            "1.0.00",
            "1.0.0-",
            "1.0.0+",
            "1.0.0-alpha..1",
            "1.0.0-01",
            "1.0.0-alpha_beta",
            "v1.0.0",
            " 1.0.0",
            "1.0.0 ",
            "-1.0.0",
        ] {
            assert!(Version::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn accepts_edge_identifiers() {
        for good in ["0.0.0", "1.0.0-0", "1.0.0-0a", "1.0.0-x-y-z.--", "1.0.0+001", "1.0.0-a+b-c"] {
            assert!(Version::parse(good).is_ok(), "rejected {good:?}");
        }
    }

    #[test]
    fn round_trip_formatting() {
        for s in [
            "0.1.0",
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-0.3.7",
            "1.0.0-x.7.z.92",
            "1.0.0+21AF26D3----117B344092BD",
            "1.0.0-beta+exp.sha.5114f85",
            "10.20.30-rc.1+build.001",
        ] {
            assert_eq!(v(s).to_string(), s);
        }
    }

    #[test]
    fn core_triple_ordering() {
        assert!(v("1.0.0") < v("2.0.0"));
        assert!(v("2.0.0") < v("2.1.0"));
        assert!(v("2.1.0") < v("2.1.1"));
        assert!(v("1.10.0") > v("1.9.0"));
    }

    #[test]
    fn pre_release_sorts_before_release() {
        assert!(v("1.0.0-rc.1") < v("1.0.0"));
        assert!(v("1.0.0") > v("1.0.0-0"));
    }

    #[test]
    fn numeric_identifiers_compare_by_value() {
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-99999999999999999999") < v("1.0.0-100000000000000000000"));
    }

    #[test]
    fn numeric_sorts_before_alphanumeric() {
        assert!(v("1.0.0-1") < v("1.0.0-a"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-alpha.beta"));
    }

    #[test]
    fn alphanumeric_is_ascii_order() {
        assert!(v("1.0.0-Beta") < v("1.0.0-alpha"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha-1"));
    }

    #[test]
    fn build_metadata_is_ignored() {
        assert_eq!(v("1.0.0+a"), v("1.0.0+b"));
        assert_eq!(v("1.0.0-rc.1+x").cmp(&v("1.0.0-rc.1")), Ordering::Equal);
        assert_eq!(v("1.0.0+a").to_string(), "1.0.0+a");
    }

    #[test]
    fn backward_compatibility() {
        assert!(v("1.2.0").is_backward_compatible(&v("1.1.0")));
        assert!(v("1.1.1").is_backward_compatible(&v("1.1.0")));
        assert!(!v("1.1.0").is_backward_compatible(&v("1.1.0")));
        assert!(!v("1.0.0").is_backward_compatible(&v("1.1.0")));
        assert!(!v("2.0.0").is_backward_compatible(&v("1.1.0")));
    }

    #[test]
    fn api_compatibility() {
        assert!(v("1.2.0").is_api_compatible(&v("1.9.3")));
        assert!(!v("1.2.0").is_api_compatible(&v("2.0.0")));
        assert!(v("0.3.1").is_api_compatible(&v("0.3.9")));
        assert!(!v("0.3.1").is_api_compatible(&v("0.4.0")));
    }

    #[test]
    fn serde_as_string() {
        let version = v("1.2.3-rc.1+b5");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"1.2.3-rc.1+b5\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_string(), "1.2.3-rc.1+b5");
        assert!(serde_json::from_str::<Version>("\"1.2\"").is_err());
    }
}
