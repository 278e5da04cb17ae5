use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the human readable size formatter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("number must be non-negative: {0}")]
    InvalidArgument(i128),

    #[error("number too large: {0}")]
    Overflow(i128),
}

/// Raised by the invocation wrapper when a command gets the wrong number of
/// positional arguments.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{name} takes {expected} but {given} were given")]
pub struct ArityError {
    pub name: String,
    pub expected: String,
    pub given: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Enumerating the current directory failed. This one is not turned into
    /// an output line: it escapes `EditorSession::update`.
    #[error("failed to list {path:?}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Size(#[from] SizeError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
