//! Version compatibility rules shared by the override and flattening stages.

use std::fmt;

use volt_core::package::PackageId;

use crate::version::Version;

/// How an ancestor's choice differs from the requirement it replaced.
/// Variants are listed in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// Same name, different scope.
    ScopeChanged,
    MajorChanged,
    /// Minor change on a `0.x` line.
    UnstableMinorChanged,
    MinorDowngrade,
    PatchDowngrade,
    PreReleaseDowngrade,
}

impl OverrideKind {
    /// Classify replacing `required` with `chosen`. Returns `None` when the
    /// replacement is a safe upgrade (or identical) and needs no warning.
    pub fn classify(
        chosen: (&PackageId, &Version),
        required: (&PackageId, &Version),
    ) -> Option<Self> {
        let (chosen_id, new) = chosen;
        let (required_id, old) = required;

        if chosen_id.scope != required_id.scope {
            return Some(Self::ScopeChanged);
        }
        if new.major != old.major {
            return Some(Self::MajorChanged);
        }
        if new.major == 0 && new.minor != old.minor {
            return Some(Self::UnstableMinorChanged);
        }
        if new < old {
            return Some(if new.minor != old.minor {
                Self::MinorDowngrade
            } else if new.patch != old.patch {
                Self::PatchDowngrade
            } else {
                Self::PreReleaseDowngrade
            });
        }
        None
    }

    /// What the requiring package should expect after the override.
    pub fn consequence(&self) -> &'static str {
        match self {
            Self::ScopeChanged => {
                "Scope was overwritten, now it might be a completely different package."
            }
            Self::MajorChanged => "Major version was changed, expect an incompatible API.",
            Self::UnstableMinorChanged => {
                "Minor version in development phase was changed, expect an incompatible API."
            }
            Self::MinorDowngrade => {
                "Minor version was downgraded, some required features may not be available."
            }
            Self::PatchDowngrade => {
                "Patch version was downgraded, some required bug fixes are not present."
            }
            Self::PreReleaseDowngrade => {
                "Pre-release tag was downgraded, some required bug fixes may not be available."
            }
        }
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.consequence())
    }
}

/// Whether two resolved packages sharing a name cannot be merged into one:
/// different scope, different major, or different minor on a `0.x` line.
pub fn is_conflict(a: (&PackageId, &Version), b: (&PackageId, &Version)) -> bool {
    a.0.scope != b.0.scope || !a.1.is_api_compatible(b.1)
}
