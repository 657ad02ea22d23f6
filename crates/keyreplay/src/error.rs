//! Error handling for the keyreplay crate.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for keyreplay operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum Error {
    /// The scenario file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The scenario file is not valid RON for a scenario.
    #[error("{}:{line}:{col}: {message}", path.display())]
    Scenario {
        /// Scenario file.
        path: PathBuf,
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        col: usize,
        /// Parser message.
        message: String,
    },
    /// The remap store failed to load.
    #[error("store error: {0}")]
    Store(#[from] keystore::Error),
    /// A key name in the scenario does not resolve to a key code.
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    /// Writing the report failed.
    #[error("failed to render report: {0}")]
    Report(#[from] serde_json::Error),
}

impl Error {
    /// Exit status for this error: 2 for bad input, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scenario { .. } | Self::UnknownKey(_) => 2,
            Self::Io { .. } | Self::Store(_) | Self::Report(_) => 1,
        }
    }
}
