use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for Volt file and configuration handling.
#[derive(Debug, Error, Diagnostic)]
pub enum VoltError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed package manifest (`package.json` or archive manifest).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check the package.json for syntax errors"))]
    Manifest { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check $VOLT_PATH/config.toml"))]
    Config { message: String },

    /// Resolved dependency list could not be read or written.
    #[error("Lockfile error: {message}")]
    Lockfile { message: String },

    /// Dependency resolution failed.
    #[error("Resolution error: {message}")]
    Resolution { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type VoltResult<T> = miette::Result<T>;
