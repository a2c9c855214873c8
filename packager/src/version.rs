//! Version resolution for plugin source trees.
//!
//! Versions are derived from `git describe` and rendered in PEP 440 style,
//! with the same metadata keys the Python `versioneer` tool reports so that
//! existing consumers of `properties.yml` keep working. The source tree is
//! always passed explicitly (`git -C <dir>`); the process working directory
//! is never changed.

use crate::error::{PackagerError, Result};
use crate::executor::{CommandExecutor, run_checked, stdout_text};
use camino::Utf8Path;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Version reported when `git describe` output cannot be interpreted.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Version string and associated metadata for a source tree.
///
/// Field order matches the sorted key order of the legacy YAML output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Commit date in `YYYY-MM-DDTHH:MM:SS±ZZZZ` form.
    pub date: Option<String>,
    /// Whether the working tree had uncommitted changes.
    pub dirty: Option<bool>,
    /// Why the version could not be computed, if it could not.
    pub error: Option<String>,
    /// Full commit hash of the checked-out revision.
    #[serde(rename = "full-revisionid")]
    pub full_revisionid: Option<String>,
    /// Rendered PEP 440 version.
    pub version: String,
}

impl VersionInfo {
    /// Metadata for a tree at `full_revisionid` whose version could not be
    /// determined.
    #[must_use]
    pub fn unknown(full_revisionid: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            date: None,
            dirty: None,
            error: Some(error.into()),
            full_revisionid: Some(full_revisionid.into()),
            version: UNKNOWN_VERSION.to_owned(),
        }
    }
}

/// Resolves version information for a source tree.
#[cfg_attr(test, mockall::automock)]
pub trait VersionResolver {
    /// Returns the version of the tree rooted at `source_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying version-control tooling fails.
    fn resolve(&self, source_dir: &Utf8Path) -> Result<VersionInfo>;
}

/// The pieces of a `git describe --tags --dirty --always --long` result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribePieces {
    /// Nearest tag with the tag prefix removed, if any tag is reachable.
    pub closest_tag: Option<String>,
    /// Commits since `closest_tag`. Zero when untagged until filled in from
    /// `git rev-list --count`.
    pub distance: u64,
    /// Abbreviated commit hash.
    pub short: String,
    /// Whether the working tree had uncommitted changes.
    pub dirty: bool,
}

impl DescribePieces {
    /// Renders the pieces as a PEP 440 version.
    ///
    /// - `TAG` when exactly on a clean tag
    /// - `TAG+DISTANCE.gHEX[.dirty]` otherwise, with `.` instead of `+` when
    ///   the tag already carries a local version segment
    /// - `0+untagged.DISTANCE.gHEX[.dirty]` when no tag is reachable
    ///
    /// # Examples
    ///
    /// ```
    /// use plugin_packager::version::DescribePieces;
    ///
    /// let pieces = DescribePieces {
    ///     closest_tag: Some("1.2.0".to_owned()),
    ///     distance: 3,
    ///     short: "abc1234".to_owned(),
    ///     dirty: true,
    /// };
    /// assert_eq!(pieces.render_pep440(), "1.2.0+3.gabc1234.dirty");
    /// ```
    #[must_use]
    pub fn render_pep440(&self) -> String {
        let dirty_suffix = if self.dirty { ".dirty" } else { "" };
        match &self.closest_tag {
            Some(tag) if self.distance == 0 && !self.dirty => tag.clone(),
            Some(tag) => {
                let separator = if tag.contains('+') { '.' } else { '+' };
                format!(
                    "{tag}{separator}{}.g{}{dirty_suffix}",
                    self.distance, self.short
                )
            }
            None => format!(
                "0+untagged.{}.g{}{dirty_suffix}",
                self.distance, self.short
            ),
        }
    }
}

/// Parses `git describe --tags --dirty --always --long` output.
///
/// Tagged output has the shape `TAG-NUM-gHEX[-dirty]`; untagged output is a
/// bare abbreviated hash, optionally followed by `-dirty`.
///
/// # Errors
///
/// Returns a description of the problem when the output does not have one
/// of the expected shapes or the tag lacks `tag_prefix`.
pub fn parse_describe(raw: &str, tag_prefix: &str) -> std::result::Result<DescribePieces, String> {
    let trimmed = raw.trim();
    let (describe, dirty) = match trimmed.strip_suffix("-dirty") {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    if !describe.contains('-') {
        if !is_hex(describe) {
            return Err(format!("unable to parse git-describe output: '{trimmed}'"));
        }
        return Ok(DescribePieces {
            closest_tag: None,
            distance: 0,
            short: describe.to_owned(),
            dirty,
        });
    }

    let mut parts = describe.rsplitn(3, '-');
    let (Some(hash_part), Some(distance_part), Some(tag)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("unable to parse git-describe output: '{trimmed}'"));
    };

    let short = hash_part
        .strip_prefix('g')
        .filter(|hex| is_hex(hex))
        .ok_or_else(|| format!("unable to parse git-describe output: '{trimmed}'"))?;
    let distance = distance_part
        .parse::<u64>()
        .map_err(|_| format!("unable to parse git-describe output: '{trimmed}'"))?;
    let closest_tag = tag
        .strip_prefix(tag_prefix)
        .ok_or_else(|| format!("tag '{tag}' doesn't start with prefix '{tag_prefix}'"))?;

    Ok(DescribePieces {
        closest_tag: Some(closest_tag.to_owned()),
        distance,
        short: short.to_owned(),
        dirty,
    })
}

fn is_hex(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

/// Normalizes `git show --format=%ci` output (`2026-01-02 03:04:05 +0000`)
/// to `2026-01-02T03:04:05+0000`.
#[must_use]
pub fn normalize_commit_date(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.split_once(' ') {
        Some((day, rest)) => {
            let time_and_zone = rest.replacen(' ', "", 1);
            format!("{day}T{time_and_zone}")
        }
        None => trimmed.to_owned(),
    }
}

/// Resolves versions by querying `git` in the source tree.
pub struct GitVersionResolver<'a> {
    executor: &'a dyn CommandExecutor,
    tag_prefix: String,
}

impl<'a> GitVersionResolver<'a> {
    /// Creates a resolver that treats every tag as a bare version.
    #[must_use]
    pub const fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self {
            executor,
            tag_prefix: String::new(),
        }
    }

    /// Strips `prefix` (for example `v`) from tags before rendering.
    #[must_use]
    pub fn with_tag_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    fn git(&self, source_dir: &Utf8Path, operation: &'static str, args: &[&str]) -> Result<String> {
        let mut full_args = vec!["-C", source_dir.as_str()];
        full_args.extend_from_slice(args);
        let output = run_checked(self.executor, "git", operation, &full_args)?;
        Ok(stdout_text(&output))
    }

    fn describe(&self, source_dir: &Utf8Path) -> Result<String> {
        let match_pattern = format!("{}*", self.tag_prefix);
        let mut args = vec!["describe", "--tags", "--dirty", "--always", "--long"];
        if !self.tag_prefix.is_empty() {
            args.push("--match");
            args.push(match_pattern.as_str());
        }
        self.git(source_dir, "describe", &args)
    }
}

impl VersionResolver for GitVersionResolver<'_> {
    fn resolve(&self, source_dir: &Utf8Path) -> Result<VersionInfo> {
        let raw = self.describe(source_dir)?;
        let full = self.git(source_dir, "rev-parse", &["rev-parse", "HEAD"])?;
        let mut pieces = match parse_describe(&raw, &self.tag_prefix) {
            Ok(pieces) => pieces,
            Err(message) => {
                warn!("{message}; reporting version {UNKNOWN_VERSION}");
                return Ok(VersionInfo::unknown(full, message));
            }
        };

        if pieces.closest_tag.is_none() {
            let count = self.git(source_dir, "rev-list", &["rev-list", "HEAD", "--count"])?;
            pieces.distance = count.parse::<u64>().map_err(|err| PackagerError::ExternalTool {
                tool: "git".to_owned(),
                operation: "rev-list",
                message: format!("unexpected commit count '{count}': {err}"),
            })?;
        }

        let date = self.git(source_dir, "show", &["show", "-s", "--format=%ci", "HEAD"])?;

        let version = pieces.render_pep440();
        debug!("resolved version {version} for {source_dir}");
        Ok(VersionInfo {
            date: Some(normalize_commit_date(&date)),
            dirty: Some(pieces.dirty),
            error: None,
            full_revisionid: Some(full),
            version,
        })
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
