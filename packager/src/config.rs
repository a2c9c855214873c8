//! Packaging request resolution.
//!
//! A [`PackagingRequest`] is assembled from explicit command-line values,
//! falling back to the Conda build environment (`SRC_DIR`, `PREFIX`,
//! `PKG_NAME`). Environment access is abstracted behind [`EnvSource`] so the
//! packaging pipeline itself never reads process-global state.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Environment variable holding the plugin source tree.
pub const SRC_DIR_VAR: &str = "SRC_DIR";

/// Environment variable holding the installation prefix.
pub const PREFIX_VAR: &str = "PREFIX";

/// Environment variable holding the package name.
pub const PKG_NAME_VAR: &str = "PKG_NAME";

/// Application namespace under `<PREFIX>/share`.
pub const PLUGIN_NAMESPACE: &str = "microdrop";

/// Source and target directories for one packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingRequest {
    source_dir: Utf8PathBuf,
    target_dir: Utf8PathBuf,
}

impl PackagingRequest {
    /// Creates a request from explicit directories.
    #[must_use]
    pub fn new(source_dir: impl Into<Utf8PathBuf>, target_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
        }
    }

    /// The plugin source tree.
    #[must_use]
    pub fn source_dir(&self) -> &Utf8Path {
        &self.source_dir
    }

    /// The installation directory the plugin is materialized into.
    #[must_use]
    pub fn target_dir(&self) -> &Utf8Path {
        &self.target_dir
    }
}

/// Read-only view of environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolves a [`PackagingRequest`] from explicit values and the environment.
///
/// Each setting is taken from its explicit value when present, otherwise
/// from the environment, otherwise resolution fails with
/// [`PackagerError::Configuration`]. Empty environment values are treated
/// as unset. Resolution never touches the file system.
pub struct RequestResolver<'a> {
    env: &'a dyn EnvSource,
}

impl<'a> RequestResolver<'a> {
    /// Creates a resolver reading fallbacks from `env`.
    #[must_use]
    pub const fn new(env: &'a dyn EnvSource) -> Self {
        Self { env }
    }

    /// Resolves the source and target directories.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Configuration`] when a directory is not
    /// given explicitly and its fallback variables are missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_packager::config::RequestResolver;
    /// use std::collections::HashMap;
    ///
    /// let env: HashMap<String, String> = [
    ///     ("SRC_DIR", "/work/plugin-foo"),
    ///     ("PREFIX", "/opt/conda"),
    ///     ("PKG_NAME", "plugin-foo"),
    /// ]
    /// .into_iter()
    /// .map(|(k, v)| (k.to_owned(), v.to_owned()))
    /// .collect();
    ///
    /// let request = RequestResolver::new(&env).resolve(None, None)?;
    /// assert_eq!(request.source_dir(), "/work/plugin-foo");
    /// assert_eq!(
    ///     request.target_dir(),
    ///     "/opt/conda/share/microdrop/plugins/available/plugin-foo"
    /// );
    /// # Ok::<(), plugin_packager::error::PackagerError>(())
    /// ```
    pub fn resolve(
        &self,
        source_dir: Option<Utf8PathBuf>,
        target_dir: Option<Utf8PathBuf>,
    ) -> Result<PackagingRequest> {
        let source = match source_dir {
            Some(dir) => dir,
            None => Utf8PathBuf::from(self.required(
                SRC_DIR_VAR,
                "source directory",
                "--source-dir",
            )?),
        };
        let target = match target_dir {
            Some(dir) => dir,
            None => self.default_target_dir()?,
        };
        Ok(PackagingRequest::new(source, target))
    }

    /// Composes `<PREFIX>/share/microdrop/plugins/available/<PKG_NAME>`.
    fn default_target_dir(&self) -> Result<Utf8PathBuf> {
        let prefix = self.required(PREFIX_VAR, "installation prefix", "--target-dir")?;
        let pkg_name = self.required(PKG_NAME_VAR, "package name", "--target-dir")?;
        Ok(Utf8PathBuf::from(prefix)
            .join("share")
            .join(PLUGIN_NAMESPACE)
            .join("plugins")
            .join("available")
            .join(pkg_name))
    }

    fn required(
        &self,
        variable: &'static str,
        setting: &'static str,
        flag: &'static str,
    ) -> Result<String> {
        self.env
            .var(variable)
            .filter(|value| !value.is_empty())
            .ok_or(PackagerError::Configuration {
                setting,
                flag,
                variable,
            })
    }
}
