//! MicroDrop plugin packager library.
//!
//! Copies a plugin's tracked source tree into a Conda installation prefix,
//! strips build-only files, and writes a `properties.yml` manifest. It is
//! used by the `plugin-packager` binary from conda-build recipes.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Packaging request resolution from flags and environment
//! - [`error`] - Error taxonomy
//! - [`executor`] - External command execution
//! - [`extraction`] - Snapshot archive extraction via 7-Zip
//! - [`manifest`] - The `properties.yml` manifest
//! - [`packager`] - Pipeline orchestration
//! - [`prune`] - Removal of the recipe and VCS metadata
//! - [`snapshot`] - `git archive` source snapshots
//! - [`version`] - `git describe` based version resolution

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod extraction;
pub mod manifest;
pub mod packager;
pub mod prune;
pub mod snapshot;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod version;
