use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use super::error::FieldCipherError;
use crate::{DEFAULT_ITERATIONS, ITERATIONS_ENV, KEY_ENV, SALT_ENV};

/// Construction options for a [`FieldCipher`](super::cipher::FieldCipher).
///
/// Mirrors the `{ "key": ..., "salt": ... }` hash a field-encryption
/// framework hands to its providers. Both `key` and `salt` are required at
/// construction; they are optional here so sources can be merged first.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderOptions {
    pub key: Option<String>,
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
}

impl ProviderOptions {
    /// Create options from a passphrase and salt with default iterations
    pub fn new(key: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            salt: Some(salt.into()),
            iterations: None,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Load options from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FieldCipherError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let options = serde_json::from_str(&contents)?;
        log::debug!("Loaded provider options from {}", path.as_ref().display());
        Ok(options)
    }

    /// Read options from `FIELD_CIPHER_KEY`, `FIELD_CIPHER_SALT` and
    /// `FIELD_CIPHER_ITER`
    pub fn from_env() -> Result<Self, FieldCipherError> {
        Self::default().merge_env()
    }

    /// Fill every unset field from the environment; values already set win
    pub fn merge_env(self) -> Result<Self, FieldCipherError> {
        self.merge_lookup(|name| std::env::var(name).ok())
    }

    /// Fill every unset field from `lookup`, keyed by environment variable name
    ///
    /// A variable is only read, and the iteration count only parsed, when
    /// the field it would fill is still unset.
    pub fn merge_lookup<F>(self, lookup: F) -> Result<Self, FieldCipherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let iterations = match self.iterations {
            Some(iterations) => Some(iterations),
            None => lookup(ITERATIONS_ENV).map(|raw| parse_iterations(&raw)).transpose()?,
        };

        Ok(Self {
            key: self.key.or_else(|| lookup(KEY_ENV)),
            salt: self.salt.or_else(|| lookup(SALT_ENV)),
            iterations,
        })
    }

    /// Fill every unset field from `fallback`; values already set win
    pub fn merge(self, fallback: ProviderOptions) -> Self {
        Self {
            key: self.key.or(fallback.key),
            salt: self.salt.or(fallback.salt),
            iterations: self.iterations.or(fallback.iterations),
        }
    }

    /// Iteration count, falling back to the default
    pub fn iterations(&self) -> u32 {
        self.iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    /// Check that key and salt are present and non-blank
    pub fn validate(&self) -> Result<(&str, &str), FieldCipherError> {
        let key = match self.key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(FieldCipherError::MissingKey),
        };
        let salt = match self.salt.as_deref() {
            Some(salt) if !salt.trim().is_empty() => salt,
            _ => return Err(FieldCipherError::MissingSalt),
        };
        if self.iterations == Some(0) {
            return Err(FieldCipherError::InvalidIterations);
        }
        Ok((key, salt))
    }
}

fn parse_iterations(raw: &str) -> Result<u32, FieldCipherError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| FieldCipherError::UnparseableIterations(raw.to_string()))
}

// Never print the passphrase
impl fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("salt", &self.salt)
            .field("iterations", &self.iterations)
            .finish()
    }
}
