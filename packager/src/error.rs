//! Error types for the DS4Windows post-build packager.
//!
//! Each variant names the step that failed and carries the path involved so
//! the one-line diagnostic printed by the binary is enough to act on.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while packaging a build.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The build output directory does not exist.
    ///
    /// This is the only precondition the packager checks before mutating
    /// anything, and it maps to exit status 1.
    #[error("target_dir not found: {path}")]
    OutputDirNotFound {
        /// The path that was supplied on the command line.
        path: Utf8PathBuf,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// The version record could not be written.
    #[error("failed to write version file {path}")]
    VersionRecord {
        /// Destination of the version record.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A localisation file could not be moved into the `Lang` directory.
    #[error("failed to move {from} to {to}")]
    LanguageMove {
        /// Source file inside a language folder.
        from: Utf8PathBuf,
        /// Destination inside `Lang/<code>`.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The staging tree could not be prepared or populated.
    #[error("staging failed at {path}")]
    Staging {
        /// The path being created, copied or removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The staging directory would replace the build output itself.
    #[error("staging directory {path} is the build output directory; rename the output folder")]
    StagingCollision {
        /// The shared path.
        path: Utf8PathBuf,
    },

    /// Writing or moving the zip archive failed.
    #[error("archive creation failed for {path}: {reason}")]
    Archive {
        /// The archive being produced.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The packaging configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    Config {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the parse error.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl PackagerError {
    /// Return the process exit status for this error.
    ///
    /// Every failure currently exits with status 1; the missing output
    /// directory is singled out only in how it is reported.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Return true when the error is the missing-output precondition.
    #[must_use]
    pub const fn is_missing_output(&self) -> bool {
        matches!(self, Self::OutputDirNotFound { .. })
    }
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
