use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use volt_util::errors::VoltError;

use crate::package::PackageId;

/// Default location of the resolved dependency list, relative to the project root.
pub const LOCK_PATH: &str = "cache/dependencies.json";

/// The resolved dependency set written after a successful resolution:
/// one `scope/name -> version` entry per package, in install order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedLock {
    pub packages: IndexMap<String, String>,
}

impl ResolvedLock {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PackageId, String)>,
    {
        Self {
            packages: entries
                .into_iter()
                .map(|(id, version)| (id.to_string(), version))
                .collect(),
        }
    }

    /// Version locked for a package id, if any.
    pub fn locked_version(&self, id: &PackageId) -> Option<&str> {
        self.packages.get(&id.to_string()).map(String::as_str)
    }

    /// Load and parse a `dependencies.json` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| VoltError::Lockfile {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&content).map_err(|e| {
            VoltError::Lockfile {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Serialize as tab-indented JSON.
    pub fn to_string_pretty(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the lock to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> miette::Result<()> {
        let content = self.to_string_pretty().map_err(|e| VoltError::Lockfile {
            message: format!("Failed to serialize resolved dependencies: {e}"),
        })?;
        volt_util::fs::ensure_parent_dir(path).map_err(VoltError::Io)?;
        std::fs::write(path, content).map_err(VoltError::Io)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }
}
