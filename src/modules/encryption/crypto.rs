use block_modes::BlockMode;

use crate::modules::provider::error::FieldCipherError;
use crate::Aes256Cbc;

/// AES block size; CBC consumes exactly this many IV bytes
pub const BLOCK_SIZE: usize = 16;

/// IV shared by every encryption under every key.
///
/// Hex: `4358eccd66f96e36c0c35420f619f0ced2e2c6d20556df2ba7af26761dab7fe7f0d676520176f11dac8c0e22d64ef4e195bc7406bf5a0c211c59bc2a196ae6a8`.
/// Reusing it makes encryption deterministic, which leaks equality between
/// stored values. Changing it breaks every ciphertext written before.
pub const CONSTANT_IV: [u8; 64] = [
    0x43, 0x58, 0xec, 0xcd, 0x66, 0xf9, 0x6e, 0x36,
    0xc0, 0xc3, 0x54, 0x20, 0xf6, 0x19, 0xf0, 0xce,
    0xd2, 0xe2, 0xc6, 0xd2, 0x05, 0x56, 0xdf, 0x2b,
    0xa7, 0xaf, 0x26, 0x76, 0x1d, 0xab, 0x7f, 0xe7,
    0xf0, 0xd6, 0x76, 0x52, 0x01, 0x76, 0xf1, 0x1d,
    0xac, 0x8c, 0x0e, 0x22, 0xd6, 0x4e, 0xf4, 0xe1,
    0x95, 0xbc, 0x74, 0x06, 0xbf, 0x5a, 0x0c, 0x21,
    0x1c, 0x59, 0xbc, 0x2a, 0x19, 0x6a, 0xe6, 0xa8,
];

/// Bytes of `iv` the cipher actually consumes
fn block_iv(iv: &[u8]) -> &[u8] {
    &iv[..iv.len().min(BLOCK_SIZE)]
}

fn build_cipher(encryption_key: &[u8], iv: &[u8]) -> Result<Aes256Cbc, FieldCipherError> {
    Aes256Cbc::new_from_slices(encryption_key, block_iv(iv))
        .map_err(|e| FieldCipherError::CipherInit(e.to_string()))
}

/// Function to encrypt data using AES-256-CBC
///
/// IVs longer than one block are truncated to the block size.
pub fn encrypt_data(data: &[u8], encryption_key: &[u8], iv: &[u8]) -> Result<Vec<u8>, FieldCipherError> {
    let cipher = build_cipher(encryption_key, iv)?;
    Ok(cipher.encrypt_vec(data))
}

/// Function to decrypt data using AES-256-CBC
///
/// CBC carries no authentication tag. A wrong key or tampered input is only
/// caught when the PKCS#7 padding comes out invalid; otherwise the result is
/// garbage bytes.
pub fn decrypt_data(encrypted_data: &[u8], encryption_key: &[u8], iv: &[u8]) -> Result<Vec<u8>, FieldCipherError> {
    let cipher = build_cipher(encryption_key, iv)?;
    cipher
        .decrypt_vec(encrypted_data)
        .map_err(|_| FieldCipherError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Test that encryption and decryption work correctly (roundtrip test)
    fn test_encryption_decryption_roundtrip() {
        let original_data = "This is a secret message that needs to be encrypted";

        let encryption_key: Vec<u8> = (1..=32).collect();
        let iv: Vec<u8> = (1..=16).collect();

        let encrypted_data = encrypt_data(original_data.as_bytes(), &encryption_key, &iv).unwrap();

        assert!(!encrypted_data.is_empty());
        assert_eq!(encrypted_data.len() % BLOCK_SIZE, 0);
        assert_ne!(encrypted_data, original_data.as_bytes());

        let decrypted_data = decrypt_data(&encrypted_data, &encryption_key, &iv).unwrap();
        assert_eq!(decrypted_data, original_data.as_bytes());
    }

    #[test]
    /// Test that decryption with an incorrect key never returns the plaintext
    fn test_decryption_with_wrong_key() {
        let original_data = "This is a secret message that needs to be encrypted";
        let encryption_key: Vec<u8> = vec![1; 32];
        let wrong_key: Vec<u8> = vec![2; 32];

        let encrypted_data = encrypt_data(original_data.as_bytes(), &encryption_key, &CONSTANT_IV).unwrap();
        let result = decrypt_data(&encrypted_data, &wrong_key, &CONSTANT_IV);

        assert!(result.map_or(true, |data| data != original_data.as_bytes()));
    }

    #[test]
    fn test_constant_iv_is_deterministic() {
        let key = vec![7u8; 32];
        let first = encrypt_data(b"same input", &key, &CONSTANT_IV).unwrap();
        let second = encrypt_data(b"same input", &key, &CONSTANT_IV).unwrap();
        assert_eq!(first, second);

        let other = encrypt_data(b"other input", &key, &CONSTANT_IV).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn test_long_iv_uses_first_block() {
        let key = vec![3u8; 32];
        let full = encrypt_data(b"payload", &key, &CONSTANT_IV).unwrap();
        let first_block = encrypt_data(b"payload", &key, &CONSTANT_IV[..BLOCK_SIZE]).unwrap();
        assert_eq!(full, first_block);
    }

    #[test]
    fn test_constant_iv_hex() {
        assert_eq!(
            hex::encode(CONSTANT_IV),
            "4358eccd66f96e36c0c35420f619f0ced2e2c6d20556df2ba7af26761dab7fe7\
             f0d676520176f11dac8c0e22d64ef4e195bc7406bf5a0c211c59bc2a196ae6a8"
        );
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(matches!(
            encrypt_data(b"x", &[0u8; 16], &CONSTANT_IV),
            Err(FieldCipherError::CipherInit(_))
        ));
        assert!(matches!(
            encrypt_data(b"x", &[0u8; 32], &[0u8; 8]),
            Err(FieldCipherError::CipherInit(_))
        ));
        assert!(matches!(
            decrypt_data(&[0u8; 5], &[0u8; 32], &CONSTANT_IV),
            Err(FieldCipherError::Decryption)
        ));
    }
}
