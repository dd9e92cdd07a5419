use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use volt_util::errors::VoltError;

/// Environment variable pointing at the Volt data directory.
pub const VOLT_PATH_ENV: &str = "VOLT_PATH";

/// Global user configuration loaded from `$VOLT_PATH/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Scope prepended to package ids given without one.
    #[serde(default = "default_scope", rename = "default-scope")]
    pub default_scope: String,

    /// Root of the local package store. Defaults to `$VOLT_PATH/packages`.
    #[serde(default, rename = "packages-dir")]
    pub packages_dir: Option<PathBuf>,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Dependency resolution settings from `[resolver]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Upper bound on manifest fetches running at once while prefetching.
    #[serde(
        default = "default_max_concurrent_fetches",
        rename = "max-concurrent-fetches"
    )]
    pub max_concurrent_fetches: usize,

    /// Fetch the manifests of a whole tree level concurrently before
    /// walking it.
    #[serde(default = "default_prefetch")]
    pub prefetch: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_scope: default_scope(),
            packages_dir: None,
            resolver: ResolverConfig::default(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: default_max_concurrent_fetches(),
            prefetch: default_prefetch(),
        }
    }
}

fn default_scope() -> String {
    "volt".to_string()
}

fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_prefetch() -> bool {
    true
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| VoltError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            VoltError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        volt_path().join("config.toml")
    }

    /// Root of the local package store.
    pub fn packages_dir(&self) -> PathBuf {
        self.packages_dir
            .clone()
            .unwrap_or_else(|| volt_path().join("packages"))
    }
}

/// Returns the Volt data directory: `$VOLT_PATH`, or `~/.volt/` when unset.
pub fn volt_path() -> PathBuf {
    if let Some(path) = std::env::var_os(VOLT_PATH_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".volt")
}
