use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Authentication rejected: {0}")]
    Unauthorized(String),

    #[error("Request rejected with code {code}: {message}")]
    Rejected { code: u32, message: String },

    #[error("Unknown {kind}: {id}")]
    UnknownObject { kind: &'static str, id: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Batch too large: {size} operations (max: {max})")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}
