use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {path} returned {status}: {detail}")]
    Status {
        method: String,
        path: String,
        status: u16,
        detail: String,
    },

    #[error("Invalid dashboard URL: {0}")]
    InvalidUrl(String),

    #[error("Not logged in to the dashboard")]
    NotAuthenticated,

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
