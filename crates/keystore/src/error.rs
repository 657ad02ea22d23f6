//! Error types for key remap storage.

use std::{
    path::{Path, PathBuf},
    result::Result as StdResult,
};

use thiserror::Error;

/// Convenient result type for the keystore crate.
pub type Result<T> = StdResult<T, Error>;

#[derive(Debug, Error, Clone)]
/// Errors produced while loading or flushing a key store.
pub enum Error {
    #[error("Read error at {}: {message}", path.display())]
    /// I/O failure while reading the store file.
    Read {
        /// Store file path.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
    #[error("Store parse error at {}:{line}:{col}: {message}", path.display())]
    /// The store file is not a JSON object of integers.
    Parse {
        /// Store file path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
    },
    #[error("Write error at {}: {message}", path.display())]
    /// I/O failure while flushing the store file.
    Write {
        /// Store file path.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Access the path attached to this error.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => path,
        }
    }
}
