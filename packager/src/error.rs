//! Error types for the plugin packager.
//!
//! Every failure aborts the packaging run. The variants distinguish bad
//! configuration, failing external tools, and file-system problems so the
//! CLI can report an actionable message.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging a plugin.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Required configuration was neither passed explicitly nor found in the
    /// environment.
    #[error("configuration error: {setting} is not set; pass {flag} or export {variable}")]
    Configuration {
        /// Human-readable name of the missing setting.
        setting: &'static str,
        /// Command-line flag that would supply the setting.
        flag: &'static str,
        /// Environment variable consulted as the fallback.
        variable: &'static str,
    },

    /// An external tool could not be started or exited unsuccessfully.
    #[error("{tool} {operation} failed: {message}")]
    ExternalTool {
        /// Executable name (`git`, `7za`).
        tool: String,
        /// The operation being attempted (archive, extract, describe, ...).
        operation: &'static str,
        /// Captured stderr or the spawn error.
        message: String,
    },

    /// A file-system operation failed.
    #[error("file system error at {path}: {source}")]
    FileSystem {
        /// Path the operation was acting on.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The manifest could not be serialized to YAML.
    #[error("failed to serialize properties.yml: {0}")]
    ManifestSerialization(#[from] serde_yaml::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl PackagerError {
    /// Builds a [`PackagerError::FileSystem`] for `path`.
    #[must_use]
    pub fn file_system(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors raised by an external tool.
    #[must_use]
    pub const fn is_external_tool(&self) -> bool {
        matches!(self, Self::ExternalTool { .. })
    }
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
