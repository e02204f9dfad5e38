use std::io;

use thiserror::Error;

/// Errors produced while building a provider or transforming values.
#[derive(Debug, Error)]
pub enum FieldCipherError {
    /// The passphrase option was absent or blank.
    #[error("configuration error: missing :key")]
    MissingKey,

    /// The salt option was absent or blank.
    #[error("configuration error: missing :salt")]
    MissingSalt,

    #[error("configuration error: iteration count must be greater than zero")]
    InvalidIterations,

    /// An iteration count that is not a whole number.
    #[error("configuration error: unparseable iteration count {0:?}")]
    UnparseableIterations(String),

    /// Ciphertext was not valid base64.
    #[error("invalid ciphertext encoding: {0}")]
    InvalidEncoding(String),

    /// Bad block length or padding, usually the wrong key.
    #[error("decryption failed")]
    Decryption,

    #[error("decrypted data is not valid UTF-8")]
    InvalidUtf8,

    #[error("cipher initialisation failed: {0}")]
    CipherInit(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FieldCipherError {
    /// True for errors caused by missing or invalid construction options
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            FieldCipherError::MissingKey
                | FieldCipherError::MissingSalt
                | FieldCipherError::InvalidIterations
                | FieldCipherError::UnparseableIterations(_)
        )
    }
}
