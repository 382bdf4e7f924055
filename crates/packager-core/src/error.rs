//! Error type for the packaging pipeline
//!
//! Every failure the pipeline can hit is an I/O failure. The variants only
//! record which step failed and on which path, so callers can either match on
//! the step or reach straight for the underlying [`std::io::Error`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Errors arising while staging or archiving a package
#[derive(Debug, Error)]
pub enum PackagerError {
    /// The scratch directory could not be removed or recreated
    #[error("failed to reset staging directory {path}")]
    ResetStaging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory inside the staging root could not be created
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A manifest file could not be written
    #[error("failed to write file {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A manifest path is empty, absolute, or escapes the staging root
    #[error("invalid manifest path '{path}'")]
    InvalidPath {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The archive could not be created, written or flushed
    #[error("failed to write archive {path}")]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the archive back did not match the manifest
    #[error("archive verification failed for {path}")]
    Verify {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PackagerError {
    /// The underlying I/O failure
    pub fn io(&self) -> &io::Error {
        match self {
            Self::ResetStaging { source, .. }
            | Self::CreateDir { source, .. }
            | Self::WriteFile { source, .. }
            | Self::InvalidPath { source, .. }
            | Self::Archive { source, .. }
            | Self::Verify { source, .. } => source,
        }
    }

    /// Shorthand for the `io::ErrorKind` of the underlying failure
    pub fn kind(&self) -> io::ErrorKind {
        self.io().kind()
    }

    pub(crate) fn invalid_path(path: &str, reason: &str) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, reason.to_string()),
        }
    }
}
