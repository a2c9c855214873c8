//! Tests for the packaging pipeline.

use super::*;
use crate::extraction::MockArchiveExtractor;
use crate::test_utils::RecordingExecutor;
use crate::version::{MockVersionResolver, VersionInfo};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Dirs {
    _temp: TempDir,
    source: Utf8PathBuf,
    target: Utf8PathBuf,
}

#[fixture]
fn dirs() -> Dirs {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf())
        .expect("utf-8 temp path")
        .canonicalize_utf8()
        .expect("canonical temp path");
    let source = root.join("work/plugin-foo");
    fs::create_dir_all(&source).expect("mkdir source");
    let target = root.join("prefix/share/microdrop/plugins/available/plugin-foo");
    Dirs {
        _temp: temp,
        source,
        target,
    }
}

fn versions() -> VersionInfo {
    VersionInfo {
        date: None,
        dirty: Some(false),
        error: None,
        full_revisionid: Some("abc1234".to_owned()),
        version: "1.2.0".to_owned(),
    }
}

/// An extractor that lays down a recipe directory and VCS metadata, the
/// way a real snapshot of a plugin repository would.
fn populating_extractor() -> MockArchiveExtractor {
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .times(1)
        .returning(|_, dest: &Utf8Path| {
            fs::create_dir_all(dest.join(".conda-recipe")).expect("mkdir recipe");
            fs::write(dest.join(".gitignore"), "*.pyc\n").expect("write gitignore");
            fs::write(dest.join("__init__.py"), "").expect("write init");
            Ok(())
        });
    extractor
}

#[rstest]
fn package_runs_every_stage(dirs: Dirs) {
    let executor = RecordingExecutor::new();
    let extractor = populating_extractor();
    let mut resolver = MockVersionResolver::new();
    let expected_source = dirs.source.clone();
    resolver
        .expect_resolve()
        .withf(move |dir: &Utf8Path| dir == expected_source.as_path())
        .times(1)
        .returning(|_| Ok(versions()));

    let packager = Packager::new(&executor, &extractor, &resolver);
    let outcome = packager
        .package(&PackagingRequest::new(&dirs.source, &dirs.target))
        .expect("packaging should succeed");

    assert!(dirs.target.is_dir(), "target directory is created");
    assert_eq!(outcome.target_dir, dirs.target);
    assert_eq!(outcome.archive, dirs.source.join("plugin-foo.zip"));
    assert_eq!(executor.commands(), vec!["git"]);
    assert!(!dirs.target.join(".conda-recipe").exists());
    assert!(!dirs.target.join(".gitignore").exists());
    assert!(dirs.target.join("__init__.py").exists());
    assert_eq!(outcome.manifest.plugin_name, "plugin-foo");
    assert_eq!(outcome.manifest.version, "1.2.0");
    assert!(outcome.manifest_path.is_file());
}

#[rstest]
fn missing_source_is_file_system_error(dirs: Dirs) {
    let executor = RecordingExecutor::new();
    let extractor = MockArchiveExtractor::new();
    let resolver = MockVersionResolver::new();
    let missing = dirs.source.join("does-not-exist");

    let err = Packager::new(&executor, &extractor, &resolver)
        .package(&PackagingRequest::new(&missing, &dirs.target))
        .expect_err("packaging should fail");

    assert!(matches!(err, PackagerError::FileSystem { ref path, .. } if *path == missing));
    assert!(executor.calls().is_empty(), "no tool runs for a missing source");
}

#[rstest]
fn snapshot_failure_skips_extraction(dirs: Dirs) {
    let executor = RecordingExecutor::failing("git");
    let mut extractor = MockArchiveExtractor::new();
    extractor.expect_extract().times(0);
    let mut resolver = MockVersionResolver::new();
    resolver.expect_resolve().times(0);

    let err = Packager::new(&executor, &extractor, &resolver)
        .package(&PackagingRequest::new(&dirs.source, &dirs.target))
        .expect_err("packaging should fail");

    assert!(err.is_external_tool());
}

#[rstest]
fn extraction_failure_writes_no_manifest(dirs: Dirs) {
    let executor = RecordingExecutor::new();
    let mut extractor = MockArchiveExtractor::new();
    extractor
        .expect_extract()
        .times(1)
        .returning(|_, _| {
            Err(PackagerError::ExternalTool {
                tool: "7za".to_owned(),
                operation: "extract",
                message: "exited with exit status: 1".to_owned(),
            })
        });
    let mut resolver = MockVersionResolver::new();
    resolver.expect_resolve().times(0);

    let err = Packager::new(&executor, &extractor, &resolver)
        .package(&PackagingRequest::new(&dirs.source, &dirs.target))
        .expect_err("packaging should fail");

    assert!(err.is_external_tool());
    assert!(!dirs.target.join("properties.yml").exists());
}

#[rstest]
fn version_failure_writes_no_manifest(dirs: Dirs) {
    let executor = RecordingExecutor::new();
    let extractor = populating_extractor();
    let mut resolver = MockVersionResolver::new();
    resolver.expect_resolve().times(1).returning(|_| {
        Err(PackagerError::ExternalTool {
            tool: "git".to_owned(),
            operation: "describe",
            message: "fatal: not a git repository".to_owned(),
        })
    });

    let err = Packager::new(&executor, &extractor, &resolver)
        .package(&PackagingRequest::new(&dirs.source, &dirs.target))
        .expect_err("packaging should fail");

    assert!(matches!(
        err,
        PackagerError::ExternalTool {
            operation: "describe",
            ..
        }
    ));
    assert!(!dirs.target.join("properties.yml").exists());
}
