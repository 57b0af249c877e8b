use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Invalid batch limit: {0} (must be a positive integer)")]
    InvalidLimit(i64),
}
