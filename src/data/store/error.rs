use std::{io, path::PathBuf, result};

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("series is locked by another sync: {}", .path.display())]
    Locked { path: PathBuf },

    #[error("corrupt series file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("series file {} has format v{found}, expected v{expected}", .path.display())]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("series {id} already exists")]
    AlreadyExists { id: String },

    #[error("series {id} does not exist")]
    NotFound { id: String },

    #[error(
        "series {id}: row {index} (timestamp {timestamp}) is not after previous timestamp {previous}"
    )]
    OutOfOrder {
        id: String,
        index: usize,
        timestamp: i64,
        previous: i64,
    },

    #[error("failed to encode candle record: {0}")]
    Encode(#[from] bincode::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> StorageError {
        let path = path.into();
        move |source| StorageError::Io { path, source }
    }
}

pub type Result<T> = result::Result<T, StorageError>;
