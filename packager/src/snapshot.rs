//! Source-tree snapshots via `git archive`.
//!
//! Exporting through `git archive` rather than copying the working tree
//! means only tracked files are packaged, and files marked `export-subst`
//! (typically `_version.py`) have their revision placeholders expanded.

use crate::error::Result;
use crate::executor::{CommandExecutor, run_checked};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;

/// Revision exported into the snapshot archive.
pub const SNAPSHOT_REVISION: &str = "HEAD";

/// Returns the snapshot archive path for a source tree:
/// `<source_dir>/<source_dir name>.zip`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use plugin_packager::snapshot::archive_path_for;
///
/// let path = archive_path_for(Utf8Path::new("/work/plugin-foo"));
/// assert_eq!(path, "/work/plugin-foo/plugin-foo.zip");
/// ```
#[must_use]
pub fn archive_path_for(source_dir: &Utf8Path) -> Utf8PathBuf {
    let name = source_dir.file_name().unwrap_or("snapshot");
    source_dir.join(format!("{name}.zip"))
}

/// Writes a zip snapshot of the checked-out revision of `source_dir`.
///
/// Runs `git -C <source_dir> archive --format=zip -o <archive> HEAD` and
/// returns the archive path.
///
/// # Errors
///
/// Returns [`crate::error::PackagerError::ExternalTool`] if `git` cannot be
/// started or exits unsuccessfully.
pub fn create_snapshot(
    executor: &dyn CommandExecutor,
    source_dir: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let archive = archive_path_for(source_dir);
    run_checked(
        executor,
        "git",
        "archive",
        &[
            "-C",
            source_dir.as_str(),
            "archive",
            "--format=zip",
            "-o",
            archive.as_str(),
            SNAPSHOT_REVISION,
        ],
    )?;
    info!("exported {SNAPSHOT_REVISION} of {source_dir} to {archive}");
    Ok(archive)
}
