use std::fmt;

use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::modules::provider::error::FieldCipherError;
use crate::{HmacSha512, DERIVED_KEY_LEN, SALT_LEN};

/// Key material produced by [`derive_key_from_passphrase`].
///
/// The 64 derived bytes are the passphrase digest. The AES-256 key handed to
/// the block transform is the SHA-256 of their lowercase hex form, computed
/// once here. Both are zeroed on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    digest: [u8; DERIVED_KEY_LEN],
    cipher_key: [u8; 32],
}

impl DerivedKey {
    fn from_digest(digest: [u8; DERIVED_KEY_LEN]) -> Self {
        let digest_hex = Zeroizing::new(hex::encode(digest));
        let mut hashed = Sha256::digest(digest_hex.as_bytes());

        let mut cipher_key = [0u8; 32];
        cipher_key.copy_from_slice(&hashed);
        hashed.as_mut_slice().zeroize();

        Self { digest, cipher_key }
    }

    /// Lowercase hex form of the derived bytes
    pub fn to_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// 32-byte key for AES-256
    pub fn cipher_key(&self) -> &[u8; 32] {
        &self.cipher_key
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Function to generate a random salt for PBKDF2
pub fn generate_random_salt() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..SALT_LEN).map(|_| rng.gen()).collect()
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Function to derive a 64-byte key from the passphrase and salt using
/// PBKDF2-HMAC-SHA512
///
/// Blank passphrases and salts are rejected rather than replaced by a default.
pub fn derive_key_from_passphrase(
    passphrase: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<DerivedKey, FieldCipherError> {
    if is_blank(passphrase.as_bytes()) {
        return Err(FieldCipherError::MissingKey);
    }
    if is_blank(salt) {
        return Err(FieldCipherError::MissingSalt);
    }
    if iterations == 0 {
        return Err(FieldCipherError::InvalidIterations);
    }

    let mut key = [0u8; DERIVED_KEY_LEN];
    pbkdf2::<HmacSha512>(passphrase.as_bytes(), salt, iterations, &mut key);

    let derived = DerivedKey::from_digest(key);
    key.zeroize();

    log::debug!("Derived {}-byte key with {} iterations", DERIVED_KEY_LEN, iterations);
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn test_key_derivation() {
        let passphrase = "MySecurePassword123!";
        let salt = generate_random_salt();

        let key = derive_key_from_passphrase(passphrase, &salt, TEST_ITERATIONS).unwrap();
        assert_eq!(key.to_hex().len(), DERIVED_KEY_LEN * 2);

        let key2 = derive_key_from_passphrase(passphrase, &salt, TEST_ITERATIONS).unwrap();
        assert_eq!(key, key2);

        let different_passphrase = "DifferentPassword456!";
        let key3 = derive_key_from_passphrase(different_passphrase, &salt, TEST_ITERATIONS).unwrap();
        assert_ne!(key, key3);

        let different_salt = generate_random_salt();
        let key4 = derive_key_from_passphrase(passphrase, &different_salt, TEST_ITERATIONS).unwrap();
        assert_ne!(key, key4);

        let key5 = derive_key_from_passphrase(passphrase, &salt, TEST_ITERATIONS + 1).unwrap();
        assert_ne!(key, key5);
    }

    #[test]
    fn test_blank_inputs_rejected() {
        assert!(matches!(
            derive_key_from_passphrase("", b"salt", TEST_ITERATIONS),
            Err(FieldCipherError::MissingKey)
        ));
        assert!(matches!(
            derive_key_from_passphrase("  \t", b"salt", TEST_ITERATIONS),
            Err(FieldCipherError::MissingKey)
        ));
        assert!(matches!(
            derive_key_from_passphrase("secret", b"", TEST_ITERATIONS),
            Err(FieldCipherError::MissingSalt)
        ));
        assert!(matches!(
            derive_key_from_passphrase("secret", b" \n", TEST_ITERATIONS),
            Err(FieldCipherError::MissingSalt)
        ));
        assert!(matches!(
            derive_key_from_passphrase("secret", b"salt", 0),
            Err(FieldCipherError::InvalidIterations)
        ));
    }

    #[test]
    fn test_cipher_key_is_digest_of_hex() {
        let key = derive_key_from_passphrase("secret", b"salt", TEST_ITERATIONS).unwrap();
        let expected = Sha256::digest(key.to_hex().as_bytes());

        assert_eq!(key.to_hex().len(), DERIVED_KEY_LEN * 2);
        assert_eq!(key.cipher_key().as_slice(), expected.as_slice());
        assert_eq!(key.cipher_key(), key.clone().cipher_key());

        let other = derive_key_from_passphrase("secret", b"other salt", TEST_ITERATIONS).unwrap();
        assert_ne!(key.cipher_key(), other.cipher_key());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = derive_key_from_passphrase("secret", b"salt", TEST_ITERATIONS).unwrap();
        let printed = format!("{:?}", key);
        assert_eq!(printed, "DerivedKey(..)");
        assert!(!printed.contains(&key.to_hex()));
    }

    #[test]
    fn test_random_salt() {
        let salt1 = generate_random_salt();
        let salt2 = generate_random_salt();
        assert_eq!(salt1.len(), SALT_LEN);
        assert_ne!(salt1, salt2);
    }
}
