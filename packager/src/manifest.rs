//! The `properties.yml` package manifest.
//!
//! MicroDrop reads plugin identity and version from this file. The YAML is
//! written in block style with one field per line.

use crate::error::{PackagerError, Result};
use crate::version::VersionInfo;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

/// File name of the manifest inside the target directory.
pub const MANIFEST_FILE_NAME: &str = "properties.yml";

/// Identity and version of a packaged plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Conda package name.
    pub package_name: String,
    /// Plugin name as seen by MicroDrop.
    pub plugin_name: String,
    /// Rendered version string.
    pub version: String,
    /// Full version metadata.
    pub versioneer: VersionInfo,
}

impl PackageManifest {
    /// Builds the manifest for a plugin installed at `target_dir`.
    ///
    /// Both names are the base name of `target_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::FileSystem`] if `target_dir` has no final
    /// path component.
    pub fn for_target(target_dir: &Utf8Path, versions: VersionInfo) -> Result<Self> {
        let name = target_dir.file_name().ok_or_else(|| {
            PackagerError::file_system(
                target_dir,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "target directory has no base name",
                ),
            )
        })?;
        Ok(Self {
            package_name: name.to_owned(),
            plugin_name: name.to_owned(),
            version: versions.version.clone(),
            versioneer: versions,
        })
    }

    /// Serializes the manifest to block-style YAML.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ManifestSerialization`] if serialization
    /// fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes the manifest to `<target_dir>/properties.yml`, replacing any
    /// existing file, and returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ManifestSerialization`] or
    /// [`PackagerError::FileSystem`] on failure.
    pub fn write_to(&self, target_dir: &Utf8Path) -> Result<Utf8PathBuf> {
        let path = target_dir.join(MANIFEST_FILE_NAME);
        let yaml = self.to_yaml()?;
        fs::write(&path, yaml).map_err(|err| PackagerError::file_system(&path, err))?;
        info!("wrote {path}");
        Ok(path)
    }
}
