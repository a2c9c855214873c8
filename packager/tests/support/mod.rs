//! Test support for packager behavioural tests.
//!
//! [`FakeTools`] stands in for `git` and `7za`. Its `git archive` writes a
//! marker file, its `7za x` copies the tracked part of the source tree (all
//! but `.git/` and the archive itself) into the destination, and its
//! `git describe`/`rev-parse`/`show` answer with fixed metadata.

use camino::{Utf8Path, Utf8PathBuf};
use plugin_packager::error::{PackagerError, Result};
use plugin_packager::executor::CommandExecutor;
use plugin_packager::test_utils::{failure_output, output_with_stdout, success_output};
use std::fs;
use std::process::Output;

/// Full revision reported by the fake `git rev-parse HEAD`.
pub const FAKE_REVISION: &str = "abc1234def5678abc1234def5678abc1234def56";

/// Scripted replacement for the external packaging tools.
#[derive(Debug, Default)]
pub struct FakeTools {
    /// When set, `7za` exits with status 1 without extracting.
    pub fail_extraction: bool,
}

impl CommandExecutor for FakeTools {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        match (cmd, args) {
            ("git", ["-C", _, "archive", "--format=zip", "-o", archive, "HEAD"]) => {
                fs::write(archive, b"PK fake snapshot").map_err(|err| {
                    PackagerError::file_system(Utf8PathBuf::from(*archive), err)
                })?;
                Ok(success_output())
            }
            ("git", ["-C", _, "describe", ..]) => Ok(output_with_stdout("1.2.0-3-gabc1234\n")),
            ("git", ["-C", _, "rev-parse", "HEAD"]) => {
                Ok(output_with_stdout(&format!("{FAKE_REVISION}\n")))
            }
            ("git", ["-C", _, "show", ..]) => {
                Ok(output_with_stdout("2026-01-02 03:04:05 +0100\n"))
            }
            ("7za", _) if self.fail_extraction => {
                Ok(failure_output("ERROR: simulated extraction failure"))
            }
            ("7za", ["x", "-y", dest_flag, archive]) => {
                let dest = dest_flag.strip_prefix("-o").unwrap_or(*dest_flag);
                let archive_path = Utf8Path::new(archive);
                let source = archive_path.parent().expect("archive lives in the source tree");
                copy_tracked(source, Utf8Path::new(dest), archive_path);
                Ok(success_output())
            }
            _ => Ok(failure_output(&format!(
                "unexpected invocation: {cmd} {}",
                args.join(" ")
            ))),
        }
    }
}

/// Recursively copies `from` into `to`, skipping `.git/` and `archive`.
fn copy_tracked(from: &Utf8Path, to: &Utf8Path, archive: &Utf8Path) {
    fs::create_dir_all(to).expect("create destination");
    for entry_result in from.read_dir_utf8().expect("read source dir") {
        let entry = entry_result.expect("dir entry");
        let path = entry.path();
        if entry.file_name() == ".git" || path == archive {
            continue;
        }
        let dest = to.join(entry.file_name());
        if path.is_dir() {
            copy_tracked(path, &dest, archive);
        } else {
            fs::copy(path, &dest).expect("copy file");
        }
    }
}

/// Writes a plugin source tree with a recipe, git metadata and a package.
pub fn write_plugin_tree(root: &Utf8Path) {
    let files = [
        (".conda-recipe/meta.yaml", "package:\n  name: plugin-foo\n"),
        (".conda-recipe/build.sh", "plugin-packager\n"),
        (".git/HEAD", "ref: refs/heads/master\n"),
        (".gitignore", "*.pyc\n"),
        (".gitattributes", "plugin_foo/_version.py export-subst\n"),
        ("plugin_foo/__init__.py", "from ._version import get_versions\n"),
        ("plugin_foo/_version.py", "git_refnames = \"$Format:%d$\"\n"),
        ("plugin_foo/.gitkeep", ""),
        ("README.md", "# plugin-foo\n"),
    ];
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write fixture file");
    }
}

/// Lists every file below `root` as sorted relative paths.
pub fn list_files(root: &Utf8Path) -> Vec<String> {
    let mut files = Vec::new();
    collect_files(root, root, &mut files);
    files.sort();
    files
}

fn collect_files(root: &Utf8Path, dir: &Utf8Path, files: &mut Vec<String>) {
    for entry_result in dir.read_dir_utf8().expect("read dir") {
        let entry = entry_result.expect("dir entry");
        let path = entry.path();
        if path.is_dir() {
            collect_files(root, path, files);
        } else {
            let relative = path.strip_prefix(root).expect("path below root");
            files.push(relative.as_str().to_owned());
        }
    }
}
