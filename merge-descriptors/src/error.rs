//! Error types for `merge-descriptors`.

use std::{fmt, sync::Arc};

use camino::Utf8PathBuf;
use descriptor_merge::MergeError;
use thiserror::Error;

/// Errors surfaced by the `merge-descriptors` pipeline.
#[derive(Error)]
pub enum CliError {
    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A path ends in `..` or a root and so names no file.
    #[error("path '{0}' does not name a file")]
    NotAFile(Utf8PathBuf),

    /// The bundle is not valid JSON or does not match the bundle layout.
    #[error("failed to parse bundle {path}: {source}")]
    Bundle {
        /// Bundle path.
        path: Utf8PathBuf,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// Options failed to load or the merge reported errors.
    #[error("{0}")]
    Merge(#[from] Arc<MergeError>),
}

// `main` reports its error through `Debug`; show the readable form.
impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
