//! Error types for package assembly.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while assembling a package.
///
/// Every failure is fatal to the current build: there is no retry, and a
/// partially written archive should be discarded by the caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot create package file: {0}")]
    Create(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("cannot open source file {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no archive entry is open")]
    NoOpenEntry,
}

pub type Result<T> = std::result::Result<T, Error>;
