use miette::Diagnostic;
use thiserror::Error;
use volt_util::errors::VoltError;

use crate::provider::ProviderError;
use crate::version::InvalidVersion;

/// Fatal outcomes of a resolution. Any of these aborts the run and no
/// partial result is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolutionError {
    #[error("Invalid version required by {path}")]
    #[diagnostic(code(volt::resolve::invalid_version))]
    InvalidVersion {
        path: String,
        #[source]
        #[diagnostic_source]
        source: InvalidVersion,
    },

    #[error("Circular reference:\n{path}")]
    #[diagnostic(
        code(volt::resolve::cycle),
        help("a package cannot depend on itself, directly or through other packages")
    )]
    CircularReference { path: String },

    #[error("Circular reference with ambiguous scope:\n{path}")]
    #[diagnostic(
        code(volt::resolve::ambiguous_cycle),
        help("two packages with the same name from different scopes depend on each other")
    )]
    AmbiguousCircularReference { path: String },

    #[error("{existing} is incompatible with {incoming}")]
    #[diagnostic(
        code(volt::resolve::conflict),
        help(
            "override this conflict with another top-level dependency. This will emit \
             warnings, as it is only a temporary fix; the proper solution is to remove \
             one of the conflicting packages"
        )
    )]
    Conflict { existing: String, incoming: String },

    #[error("Failed to load a direct dependency")]
    #[diagnostic(code(volt::resolve::provider))]
    Provider(
        #[from]
        #[diagnostic_source]
        ProviderError,
    ),
}

impl From<ResolutionError> for VoltError {
    fn from(err: ResolutionError) -> Self {
        VoltError::Resolution {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volt_core::package::PackageId;

    #[test]
    fn conflict_names_both_paths() {
        let err = ResolutionError::Conflict {
            existing: "app/main@1.0.0 -> a/w@1.0.0 -> a/x@1.0.0".into(),
            incoming: "app/main@1.0.0 -> a/y@1.0.0 -> a/x@2.0.0".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a/w@1.0.0 -> a/x@1.0.0"));
        assert!(msg.contains("a/y@1.0.0 -> a/x@2.0.0"));
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("top-level dependency"));
    }

    #[test]
    fn provider_error_converts() {
        let id = PackageId::parse("a/x").unwrap();
        let err: ResolutionError = ProviderError::NotFound(id).into();
        assert!(matches!(err, ResolutionError::Provider(_)));
    }

    #[test]
    fn converts_into_volt_error() {
        let err = ResolutionError::CircularReference {
            path: "app/main@1.0.0 -> a/x@1.0.0 -> a/x@1.0.0".into(),
        };
        let volt: VoltError = err.into();
        assert!(volt.to_string().contains("Circular reference"));
    }
}
