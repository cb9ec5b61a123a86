//! Error types for package resolution, module serving and bundling

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library core
#[derive(Error, Debug)]
pub enum Error {
    /// The installed-packages directory does not exist
    #[error("Packages root does not exist: {}", path.display())]
    PackagesRootMissing { path: PathBuf },

    /// A file needed to serve a module or build a bundle could not be read
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A bundle path specification is not a valid glob
    #[error("Invalid path pattern '{spec}'")]
    InvalidPattern {
        spec: String,
        #[source]
        source: globset::Error,
    },

    /// A package manifest is not valid JSON
    #[error("Failed to parse manifest {}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;
