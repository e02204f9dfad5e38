//! Deterministic field encryption provider.
//!
//! Every value is encrypted with AES-256-CBC under the derived key and the
//! shared [`CONSTANT_IV`], then base64 encoded. Equal plaintexts produce equal
//! ciphertexts, which is what lets an encrypted column be searched by
//! equality, and also what lets anyone holding the column see which rows
//! share a value.

use base64::{engine::general_purpose::STANDARD as base64, Engine as _};

use super::config::ProviderOptions;
use super::error::FieldCipherError;
use super::search::{search, Record};
use crate::modules::encryption::{decrypt_data, derive_key_from_passphrase, encrypt_data, DerivedKey, CONSTANT_IV};

/// Encrypts, decrypts and searches field values under one derived key.
#[derive(Debug, Clone)]
pub struct FieldCipher {
    key: DerivedKey,
}

impl FieldCipher {
    /// Build a provider from `{key, salt}` options, deriving the key once
    pub fn new(options: &ProviderOptions) -> Result<Self, FieldCipherError> {
        let (passphrase, salt) = options.validate()?;
        let key = derive_key_from_passphrase(passphrase, salt.as_bytes(), options.iterations())?;
        log::debug!("Field cipher ready ({} PBKDF2 iterations)", options.iterations());
        Ok(Self { key })
    }

    /// Shorthand for [`FieldCipher::new`] with default iterations
    pub fn from_passphrase(passphrase: &str, salt: &str) -> Result<Self, FieldCipherError> {
        Self::new(&ProviderOptions::new(passphrase, salt))
    }

    /// Read-only view of the derived key
    pub fn key(&self) -> &DerivedKey {
        &self.key
    }

    /// Encrypt a value; the empty string is returned unchanged
    pub fn encrypt(&self, value: &str) -> Result<String, FieldCipherError> {
        if value.is_empty() {
            return Ok(String::new());
        }

        let encrypted = encrypt_data(value.as_bytes(), self.key.cipher_key(), &CONSTANT_IV)?;
        log::debug!("Encrypted {} bytes into {} bytes", value.len(), encrypted.len());
        Ok(base64.encode(encrypted))
    }

    /// Decrypt a value produced by [`FieldCipher::encrypt`]; the empty string
    /// is returned unchanged
    ///
    /// Whitespace inside the encoded input is ignored, so line-wrapped base64
    /// decodes too. CBC is unauthenticated: corrupted input that still ends in
    /// valid padding decrypts to garbage instead of failing.
    pub fn decrypt(&self, value: &str) -> Result<String, FieldCipherError> {
        if value.is_empty() {
            return Ok(String::new());
        }

        let compact: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let encrypted = base64
            .decode(compact.as_bytes())
            .map_err(|e| FieldCipherError::InvalidEncoding(e.to_string()))?;

        let decrypted = decrypt_data(&encrypted, self.key.cipher_key(), &CONSTANT_IV).map_err(|e| {
            log::warn!("Failed to decrypt {}-byte value: {}", encrypted.len(), e);
            e
        })?;

        String::from_utf8(decrypted).map_err(|_| FieldCipherError::InvalidUtf8)
    }

    /// Nullable variant of [`FieldCipher::encrypt`]: `None` stays `None`
    pub fn encrypt_field(&self, value: Option<&str>) -> Result<Option<String>, FieldCipherError> {
        value.map(|v| self.encrypt(v)).transpose()
    }

    /// Nullable variant of [`FieldCipher::decrypt`]: `None` stays `None`
    pub fn decrypt_field(&self, value: Option<&str>) -> Result<Option<String>, FieldCipherError> {
        value.map(|v| self.decrypt(v)).transpose()
    }

    /// Records whose `field` equals `criteria` as stored.
    ///
    /// No encryption happens here: for an encrypted column `criteria` must
    /// already be ciphertext. See [`FieldCipher::search_plaintext`].
    pub fn search<'a, 'q, R, I>(
        &self,
        records: I,
        field: &'q str,
        criteria: &'q str,
    ) -> impl Iterator<Item = &'a R> + 'q
    where
        'a: 'q,
        R: Record + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
        I::IntoIter: 'q,
    {
        search(records, field, criteria)
    }

    /// Records whose encrypted `field` holds `plaintext`.
    ///
    /// Encrypts `plaintext` with this provider's key first, then scans.
    pub fn search_plaintext<'a, R, I>(
        &self,
        records: I,
        field: &str,
        plaintext: &str,
    ) -> Result<Vec<&'a R>, FieldCipherError>
    where
        R: Record + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let criteria = self.encrypt(plaintext)?;
        Ok(search(records, field, &criteria).collect())
    }
}
