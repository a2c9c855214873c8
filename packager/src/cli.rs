//! CLI argument definitions for the plugin packager.
//!
//! Kept apart from the entrypoint so argument parsing can be tested without
//! running the pipeline.

use camino::Utf8PathBuf;
use clap::Parser;

/// Package a MicroDrop plugin into a Conda installation prefix.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "plugin-packager")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a MicroDrop plugin into a Conda installation prefix.\n\n",
    "Exports a git snapshot of the plugin source tree, extracts it into the ",
    "target directory, removes the Conda recipe and git metadata, and writes a ",
    "properties.yml manifest with the plugin name and version.",
))]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  SRC_DIR    Source directory used when --source-dir is omitted\n",
    "  PREFIX     Installation prefix used when --target-dir is omitted\n",
    "  PKG_NAME   Package name used when --target-dir is omitted\n\n",
    "The default target directory is\n",
    "  $PREFIX/share/microdrop/plugins/available/$PKG_NAME\n\n",
    "EXAMPLES:\n",
    "  Inside a conda-build recipe:\n",
    "    $ plugin-packager\n\n",
    "  Explicit directories:\n",
    "    $ plugin-packager -s ~/src/dmf-device-ui-plugin -t /tmp/plugins/dmf-device-ui-plugin",
))]
pub struct Cli {
    /// Plugin source directory [default: $SRC_DIR].
    ///
    /// A bare `-s` with no value also falls back to `$SRC_DIR`.
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    pub source_dir: Option<Utf8PathBuf>,

    /// Installation directory [default: $PREFIX/share/microdrop/plugins/available/$PKG_NAME].
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    pub target_dir: Option<Utf8PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
