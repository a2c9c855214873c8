//! Removal of build-only content from an extracted plugin.
//!
//! The Conda recipe directory and top-level version-control metadata
//! (`.gitignore`, `.gitattributes`, ...) travel with the snapshot but are
//! not part of the runtime plugin payload.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fs;

/// Name of the build-recipe directory.
pub const RECIPE_DIR: &str = ".conda-recipe";

/// Reserved prefix of version-control metadata entries.
pub const VCS_PREFIX: &str = ".git";

/// Returns `true` if a top-level entry name is version-control metadata.
///
/// # Examples
///
/// ```
/// use plugin_packager::prune::is_vcs_metadata;
///
/// assert!(is_vcs_metadata(".gitignore"));
/// assert!(is_vcs_metadata(".git"));
/// assert!(!is_vcs_metadata("plugin.py"));
/// assert!(!is_vcs_metadata("docs.git"));
/// ```
#[must_use]
pub fn is_vcs_metadata(name: &str) -> bool {
    name.starts_with(VCS_PREFIX)
}

/// Removes the recipe directory and top-level VCS metadata from `target_dir`.
///
/// Only direct children of `target_dir` are matched; nested entries with a
/// `.git` prefix are left in place. Returns the removed paths in the order
/// they were deleted.
///
/// # Errors
///
/// Returns [`PackagerError::FileSystem`] if the recipe directory is absent,
/// if `target_dir` cannot be listed, or if a removal fails.
pub fn prune_build_files(target_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let recipe = target_dir.join(RECIPE_DIR);
    fs::remove_dir_all(&recipe).map_err(|err| PackagerError::file_system(&recipe, err))?;
    debug!("removed {recipe}");

    let mut removed = vec![recipe];
    for path in vcs_entries(target_dir)? {
        remove_entry(&path)?;
        debug!("removed {path}");
        removed.push(path);
    }
    Ok(removed)
}

/// Lists top-level entries of `dir` whose names mark them as VCS metadata.
fn vcs_entries(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let entries = dir
        .read_dir_utf8()
        .map_err(|err| PackagerError::file_system(dir, err))?;

    let mut matches = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|err| PackagerError::file_system(dir, err))?;
        if is_vcs_metadata(entry.file_name()) {
            matches.push(entry.into_path());
        }
    }
    matches.sort();
    Ok(matches)
}

fn remove_entry(path: &Utf8Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|err| PackagerError::file_system(path, err))?;
    let outcome = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    outcome.map_err(|err| PackagerError::file_system(path, err))
}
