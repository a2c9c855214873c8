//! Plugin packager CLI entrypoint.
//!
//! Resolves the source and target directories, runs the packaging pipeline
//! against the real `git` and `7za` tools, and reports failures on stderr.

use clap::Parser;
use plugin_packager::cli::Cli;
use plugin_packager::config::{EnvSource, ProcessEnv, RequestResolver};
use plugin_packager::error::Result;
use plugin_packager::executor::SystemCommandExecutor;
use plugin_packager::extraction::SevenZipExtractor;
use plugin_packager::packager::Packager;
use plugin_packager::version::GitVersionResolver;
use std::io::Write;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &ProcessEnv);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        // A global subscriber is already installed; keep it.
    }
}

fn run(cli: &Cli, env: &dyn EnvSource) -> Result<()> {
    let request =
        RequestResolver::new(env).resolve(cli.source_dir.clone(), cli.target_dir.clone())?;
    log::debug!("resolved request: {request:?}");

    let executor = SystemCommandExecutor;
    let extractor = SevenZipExtractor::new(&executor);
    let versions = GitVersionResolver::new(&executor);
    Packager::new(&executor, &extractor, &versions).package(&request)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_packager::error::PackagerError;
    use std::collections::HashMap;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = PackagerError::ExternalTool {
            tool: "7za".to_owned(),
            operation: "extract",
            message: "exited with exit status: 1".to_owned(),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("7za extract failed"));
    }

    #[test]
    fn run_without_source_fails_before_touching_the_file_system() {
        let temp = tempfile::tempdir().expect("temp dir");
        let target = temp.path().join("plugin-foo");
        let cli = Cli {
            source_dir: None,
            target_dir: Some(target.clone().try_into().expect("utf-8 path")),
        };
        let env: HashMap<String, String> = HashMap::new();

        let err = run(&cli, &env).expect_err("run should fail");

        assert!(matches!(
            err,
            PackagerError::Configuration {
                variable: "SRC_DIR",
                ..
            }
        ));
        assert!(!target.exists(), "target must not be created");
    }
}
