#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::Error),

    #[error(transparent)]
    Kernel(#[from] kernel::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The log shrank below the position already read.
    #[error("log {path} truncated: read up to {offset} but only {len} bytes remain")]
    TruncatedLog { path: PathBuf, offset: u64, len: u64 },

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),
}
