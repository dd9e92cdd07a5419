//! Two-part package identifiers (`scope/name`).

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_SCOPE_LEN: usize = 39;
const MAX_NAME_LEN: usize = 64;

/// A package identifier made of a scope and a name, written `scope/name`.
///
/// Two ids with the same name but different scopes are distinct packages,
/// yet the resolver groups by name alone, so such a pair is treated as a
/// collision rather than silently merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageId {
    pub scope: String,
    pub name: String,
}

/// Returned when a string is not a well-formed package id.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Invalid package ID '{input}': {reason}")]
#[diagnostic(
    code(volt::package::invalid_id),
    help("package ids look like `scope/name`, e.g. `volt/json-parser`")
)]
pub struct InvalidPackageId {
    pub input: String,
    pub reason: String,
}

impl PackageId {
    /// Parse and validate a full `scope/name` id.
    pub fn parse(input: &str) -> Result<Self, InvalidPackageId> {
        let invalid = |reason: &str| InvalidPackageId {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (scope, name) = input
            .split_once('/')
            .ok_or_else(|| invalid("missing '/' between scope and name"))?;

        if scope.is_empty() || scope.len() > MAX_SCOPE_LEN {
            return Err(invalid("scope must be 1 to 39 characters long"));
        }
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(invalid("name must be 1 to 64 characters long"));
        }
        if !is_hyphenated_lowercase(scope) {
            return Err(invalid(
                "scope may only contain lowercase letters, digits and single inner hyphens",
            ));
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) || !is_hyphenated_lowercase(name)
        {
            return Err(invalid(
                "name must start with a lowercase letter and may only contain lowercase letters, digits and single inner hyphens",
            ));
        }

        Ok(Self {
            scope: scope.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse an id, prepending `default_scope` when the input is a bare name.
    pub fn with_default_scope(input: &str, default_scope: &str) -> Result<Self, InvalidPackageId> {
        if input.contains('/') {
            Self::parse(input)
        } else {
            Self::parse(&format!("{default_scope}/{input}"))
        }
    }

    /// Whether both ids name the same package, ignoring scope.
    pub fn same_name(&self, other: &PackageId) -> bool {
        self.name == other.name
    }
}

/// Matches `[a-z0-9]+(-[a-z0-9]+)*`.
fn is_hyphenated_lowercase(segment: &str) -> bool {
    segment.split('-').all(|part| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.name)
    }
}

impl FromStr for PackageId {
    type Err = InvalidPackageId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageId {
    type Error = InvalidPackageId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PackageId> for String {
    fn from(id: PackageId) -> Self {
        id.to_string()
    }
}
