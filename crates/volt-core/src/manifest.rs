use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use volt_util::errors::VoltError;

use crate::package::PackageId;

/// Name of the package description file at a project root.
pub const PACKAGE_FILE: &str = "package.json";

/// Declared dependencies, in declaration order: package id to exact release.
pub type Requirements = IndexMap<PackageId, String>;

/// The package being resolved for, as described by its `package.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootPackage {
    pub id: PackageId,
    pub version: String,
    #[serde(default)]
    pub dependencies: Requirements,
}

/// Everything an archive knows about one package: its published releases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub releases: IndexMap<String, Release>,
    /// Source repository the releases are tagged in, when published remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<String>,
}

/// A single published release and the dependencies it declares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub dependencies: Requirements,
}

impl RootPackage {
    /// Load and parse a `package.json` from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VoltError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_json(&content).map_err(|e| {
            VoltError::Manifest {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Parse a `package.json` document.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Walk up from `start` to the nearest directory holding a `package.json`
    /// and load it. Returns the project directory alongside the package.
    pub fn discover(start: &Path) -> miette::Result<(PathBuf, Self)> {
        let dir = volt_util::fs::find_ancestor_with(start, PACKAGE_FILE).ok_or_else(|| {
            VoltError::Manifest {
                message: format!("No \"{PACKAGE_FILE}\" in {} or its parents", start.display()),
            }
        })?;
        let package = Self::from_path(&dir.join(PACKAGE_FILE))?;
        Ok((dir, package))
    }
}

impl Manifest {
    /// Parse an archive manifest document.
    pub fn from_json(content: &str) -> miette::Result<Self> {
        serde_json::from_str(content).map_err(|e| {
            VoltError::Manifest {
                message: format!("Failed to parse package manifest: {e}"),
            }
            .into()
        })
    }

    /// Look up a release by its exact version string.
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.get(version)
    }

    pub fn has_release(&self, version: &str) -> bool {
        self.releases.contains_key(version)
    }
}

impl Release {
    pub fn new(dependencies: Requirements) -> Self {
        Self { dependencies }
    }
}
