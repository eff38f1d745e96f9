use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{0}")]
    NotFound(String),
    #[error("malformed case record: {0}")]
    Malformed(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("inference service error: {0}")]
    UpstreamError(String),
    #[error("{0}")]
    NotParseable(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
