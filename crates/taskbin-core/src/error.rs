//! Error types for the taskbin system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskbinError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("API key is not recognized")]
    InvalidKey,

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl TaskbinError {
    /// Shorthand for a [`TaskbinError::Validation`] with an owned message.
    pub fn validation(message: impl Into<String>) -> Self {
        TaskbinError::Validation {
            message: message.into(),
        }
    }
}

pub type TaskbinResult<T> = Result<T, TaskbinError>;
