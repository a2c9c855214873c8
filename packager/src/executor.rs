//! External command execution.
//!
//! Every subprocess the packager spawns (`git`, `7za`) goes through the
//! [`CommandExecutor`] trait so the pipeline can be exercised without the
//! real tools installed. Invocations block until the child exits; there is
//! no timeout.

use crate::error::{PackagerError, Result};
use log::debug;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ExternalTool`] if the command cannot be
    /// spawned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use plugin_packager::executor::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("git", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), plugin_packager::error::PackagerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        debug!("running {cmd} {}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(|err| PackagerError::ExternalTool {
                tool: cmd.to_owned(),
                operation: "launch",
                message: err.to_string(),
            })
    }
}

/// Runs a command and fails unless it exits successfully.
///
/// The trimmed stderr of a failing command becomes the error message,
/// falling back to the exit status when stderr is empty.
///
/// # Errors
///
/// Returns [`PackagerError::ExternalTool`] if the command cannot be spawned
/// or exits with a non-zero status.
pub fn run_checked(
    executor: &dyn CommandExecutor,
    cmd: &str,
    operation: &'static str,
    args: &[&str],
) -> Result<Output> {
    let output = executor.run(cmd, args)?;
    if output.status.success() {
        return Ok(output);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let message = if stderr.trim().is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr.trim().to_owned()
    };
    Err(PackagerError::ExternalTool {
        tool: cmd.to_owned(),
        operation,
        message,
    })
}

/// Returns the trimmed stdout of a command as UTF-8 text.
#[must_use]
pub fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}
