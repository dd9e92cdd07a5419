//! Recoverable problems reported alongside a successful resolution.

use std::fmt;

use volt_core::package::PackageId;

use crate::conflict::OverrideKind;
use crate::provider::ProviderError;

/// A condition the resolver worked around. Rendered to text and stored on
/// the node that declared the requirement.
#[derive(Debug, Clone)]
pub enum Warning {
    /// The requested release is not published for the package.
    MissingRelease {
        requester: String,
        id: PackageId,
        version: String,
    },
    /// The manifest of a transitive dependency could not be loaded.
    ProviderFailure { requester: String, error: ProviderError },
    /// An ancestor's direct requirement replaced a deeper one.
    Override {
        ancestor: String,
        overridden: String,
        replacement: String,
        kind: OverrideKind,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingRelease {
                requester,
                id,
                version,
            } => write!(
                f,
                "Package {requester} specifies non-existent release {version} of {id}."
            ),
            Warning::ProviderFailure { requester, error } => {
                write!(f, "Package {requester} has a dependency that was skipped: {error}")
            }
            Warning::Override {
                ancestor,
                overridden,
                replacement,
                kind,
            } => write!(f, "{ancestor} overrides {overridden} with {replacement}:\n{kind}"),
        }
    }
}
