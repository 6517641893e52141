use std::io;
use std::result;

use thiserror::Error;

/// Crate-wide error type.
///
/// `Config` signals a misuse of the bulk-write session lifecycle and is not
/// retryable until the caller installs a session. The remaining variants wrap
/// failures of the storage substrate and the staging sink; they are surfaced
/// unchanged and never retried internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("bulk staging error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = result::Result<T, Error>;
