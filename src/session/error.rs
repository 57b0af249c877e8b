use crate::batcher::BatchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read session file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Missing credential: authentication.{0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    InvalidBatchLimit(#[from] BatchError),

    #[error("Invalid page size: {0} (must be a positive integer)")]
    InvalidPageSize(i64),
}
