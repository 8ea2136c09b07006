use std::io;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures raised by a generative model collaborator.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider responded with {status}: {body}")]
    Provider { status: StatusCode, body: String },
    #[error("failed to decode provider response: {0}")]
    Decode(String),
    #[error("provider returned no candidate text")]
    EmptyResponse,
}

impl ModelError {
    /// Short label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ModelError::Timeout(_) => "timeout",
            ModelError::Transport(_) => "transport",
            ModelError::Provider { .. } => "provider",
            ModelError::Decode(_) => "decode",
            ModelError::EmptyResponse => "empty_response",
        }
    }
}
