//! DS4Windows post-build packager.
//!
//! Turns a finished DS4Windows build into a release archive: it runs the
//! dependency-path injection script, records the version, gathers satellite
//! resource folders under `Lang/<code>`, and zips the output tree as
//! `DS4Windows_<version>_<arch>.zip` beside the output directory. The
//! `ds4windows-post-build` binary wraps [`pipeline::Packager`].
//!
//! # Modules
//!
//! - [`arch`] - Architecture tag resolution from the build layout
//! - [`archive`] - Zip creation from the staging tree
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Packaging names and language list, optionally from TOML
//! - [`deps_injection`] - Invocation of the dependency-path injection script
//! - [`error`] - Error types
//! - [`executor`] - External command abstraction
//! - [`language`] - Consolidation of culture folders into `Lang`
//! - [`naming`] - Archive filename construction
//! - [`output`] - Dry-run and summary text
//! - [`pipeline`] - Ordered packaging steps
//! - [`staging`] - Product-named staging copy of the output tree
//! - [`version_record`] - The `newest.txt` version file

pub mod arch;
pub mod archive;
pub mod cli;
pub mod config;
pub mod deps_injection;
pub mod error;
pub mod executor;
pub mod language;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod staging;
pub mod version_record;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
