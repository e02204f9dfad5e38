mod crypto;
pub mod keys;

pub use crypto::{decrypt_data, encrypt_data, BLOCK_SIZE, CONSTANT_IV};
pub use keys::{derive_key_from_passphrase, generate_random_salt, DerivedKey};
