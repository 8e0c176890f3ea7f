//! Session lifecycle error types.

use taskbin_core::error::TaskbinError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("API key is not recognized")]
    InvalidKey,

    #[error("administrative secret mismatch")]
    SecretMismatch,

    #[error("administrative issuance is not configured")]
    IssuanceNotConfigured,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<SessionError> for TaskbinError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidKey => TaskbinError::InvalidKey,
            SessionError::SecretMismatch | SessionError::IssuanceNotConfigured => {
                TaskbinError::Unauthorized {
                    reason: err.to_string(),
                }
            }
            SessionError::Crypto(msg) => TaskbinError::Crypto(msg),
        }
    }
}
