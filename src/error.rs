//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A credential required by the requested operation is not configured.
    #[error("{0}")]
    Configuration(String),

    /// Non-success response, malformed success body, or transport failure.
    #[error("{message}")]
    RemoteService {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("All image generations failed: {}", .0.join(", "))]
    AggregateFailure(Vec<String>),

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("No image with id '{0}' in the gallery")]
    ImageNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Remote failure with no server-supplied code or status.
    pub fn remote(message: impl Into<String>) -> Self {
        Error::RemoteService {
            message: message.into(),
            code: None,
            status: None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteService {
            message: err.to_string(),
            code: None,
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
