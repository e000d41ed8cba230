use thiserror::Error;

/// Failures from the stations API. `Display` is the message shown to the user.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server's own `message` field when it
    /// sent one, otherwise a synthesized fallback.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response format from server")]
    InvalidFormat,

    #[error("Malformed response from server: {0}")]
    ParseError(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ServerError { status, .. } => Some(*status),
            ApiError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
