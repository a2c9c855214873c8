//! Snapshot archive extraction.
//!
//! Extraction is delegated to the 7-Zip command-line tool, which is present
//! in the Conda build environments this packager runs in.

use crate::error::Result;
use crate::executor::{CommandExecutor, run_checked};
use camino::Utf8Path;
use log::info;

/// Executable used for extraction.
pub const SEVEN_ZIP: &str = "7za";

/// Trait for extracting snapshot archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract every entry of `archive` into `dest_dir`, overwriting
    /// existing files.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PackagerError::ExternalTool`] if the
    /// extraction tool fails.
    fn extract(&self, archive: &Utf8Path, dest_dir: &Utf8Path) -> Result<()>;
}

/// Extracts archives by running `7za x -y -o<dest> <archive>`.
///
/// # Examples
///
/// ```
/// use plugin_packager::executor::SystemCommandExecutor;
/// use plugin_packager::extraction::SevenZipExtractor;
///
/// let executor = SystemCommandExecutor;
/// let extractor = SevenZipExtractor::new(&executor);
/// // Use extractor.extract(archive, dest_dir) in production
/// # let _ = extractor;
/// ```
pub struct SevenZipExtractor<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> SevenZipExtractor<'a> {
    /// Creates an extractor running `7za` through `executor`.
    #[must_use]
    pub const fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }
}

impl ArchiveExtractor for SevenZipExtractor<'_> {
    fn extract(&self, archive: &Utf8Path, dest_dir: &Utf8Path) -> Result<()> {
        let output_flag = format!("-o{dest_dir}");
        run_checked(
            self.executor,
            SEVEN_ZIP,
            "extract",
            &["x", "-y", &output_flag, archive.as_str()],
        )?;
        info!("extracted {archive} into {dest_dir}");
        Ok(())
    }
}
