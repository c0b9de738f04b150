//! Engine errors.

use std::path::PathBuf;

use thiserror::Error;

/// Engine result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Engine errors.
///
/// There is no soft failure mode: configuration errors are rejected before
/// any file is touched, and every I/O fault is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "initial value cannot be smaller than {minimum}; \
         use a greater initial value or a different implementation (got {value})"
    )]
    InitialValueTooSmall { value: i64, minimum: i64 },

    #[error("missing grid folder at '{}'", .0.display())]
    MissingBackupGrid(PathBuf),

    #[error("missing backup data file at '{}'", .0.display())]
    MissingBackupData(PathBuf),

    #[error("malformed backup properties: {0}")]
    Properties(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
