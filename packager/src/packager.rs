//! Packaging pipeline orchestration.
//!
//! [`Packager::package`] materializes a clean, versioned copy of a plugin
//! source tree:
//!
//! 1. canonicalize the source and (created) target directories
//! 2. export a `git archive` snapshot of `HEAD`
//! 3. extract the snapshot into the target directory
//! 4. prune the Conda recipe and top-level VCS metadata
//! 5. resolve the source tree's version
//! 6. write `properties.yml`
//!
//! Any failure stops the pipeline immediately. Nothing is rolled back.

use crate::config::PackagingRequest;
use crate::error::{PackagerError, Result};
use crate::executor::CommandExecutor;
use crate::extraction::ArchiveExtractor;
use crate::manifest::PackageManifest;
use crate::prune::prune_build_files;
use crate::snapshot::create_snapshot;
use crate::version::VersionResolver;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use std::fs;

/// What a successful packaging run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    /// Canonical source directory.
    pub source_dir: Utf8PathBuf,
    /// Canonical target directory.
    pub target_dir: Utf8PathBuf,
    /// Snapshot archive written inside the source directory.
    pub archive: Utf8PathBuf,
    /// Entries pruned from the target directory.
    pub removed: Vec<Utf8PathBuf>,
    /// Path of the written manifest.
    pub manifest_path: Utf8PathBuf,
    /// The manifest contents.
    pub manifest: PackageManifest,
}

/// Runs the packaging pipeline against injected collaborators.
pub struct Packager<'a> {
    executor: &'a dyn CommandExecutor,
    extractor: &'a dyn ArchiveExtractor,
    versions: &'a dyn VersionResolver,
}

impl<'a> Packager<'a> {
    /// Creates a packager.
    ///
    /// `executor` runs the snapshot export; `extractor` and `versions`
    /// handle extraction and version lookup.
    #[must_use]
    pub const fn new(
        executor: &'a dyn CommandExecutor,
        extractor: &'a dyn ArchiveExtractor,
        versions: &'a dyn VersionResolver,
    ) -> Self {
        Self {
            executor,
            extractor,
            versions,
        }
    }

    /// Packages `request.source_dir()` into `request.target_dir()`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::FileSystem`] for unreadable sources, an
    /// uncreatable target or a missing recipe directory, and
    /// [`PackagerError::ExternalTool`] when `git` or the extractor fails.
    pub fn package(&self, request: &PackagingRequest) -> Result<PackageOutcome> {
        let source_dir = canonical(request.source_dir())?;
        fs::create_dir_all(request.target_dir())
            .map_err(|err| PackagerError::file_system(request.target_dir(), err))?;
        let target_dir = canonical(request.target_dir())?;
        info!("packaging {source_dir} into {target_dir}");

        let archive = create_snapshot(self.executor, &source_dir)?;
        self.extractor.extract(&archive, &target_dir)?;
        let removed = prune_build_files(&target_dir)?;

        let versions = self.versions.resolve(&source_dir)?;
        let manifest = PackageManifest::for_target(&target_dir, versions)?;
        let manifest_path = manifest.write_to(&target_dir)?;
        info!(
            "packaged {} version {}",
            manifest.plugin_name, manifest.version
        );

        Ok(PackageOutcome {
            source_dir,
            target_dir,
            archive,
            removed,
            manifest_path,
            manifest,
        })
    }
}

fn canonical(path: &Utf8Path) -> Result<Utf8PathBuf> {
    path.canonicalize_utf8()
        .map_err(|err| PackagerError::file_system(path, err))
}

#[cfg(test)]
#[path = "packager_tests.rs"]
mod tests;
