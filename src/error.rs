use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Dashboard API error: {0}")]
    Api(#[from] ApiError),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, ExpandError>;
