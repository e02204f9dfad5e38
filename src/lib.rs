// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{encryption, provider, utils};

// Re-export commonly used types
pub use modules::encryption::keys::DerivedKey;
pub use modules::provider::cipher::FieldCipher;
pub use modules::provider::config::ProviderOptions;
pub use modules::provider::error::FieldCipherError;
pub use modules::provider::search::{search, Record};

// Constants
pub const DEFAULT_ITERATIONS: u32 = 10_000;
pub const DERIVED_KEY_LEN: usize = 64;
pub const SALT_LEN: usize = 16;
pub const KEY_ENV: &str = "FIELD_CIPHER_KEY";
pub const SALT_ENV: &str = "FIELD_CIPHER_SALT";
pub const ITERATIONS_ENV: &str = "FIELD_CIPHER_ITER";

// Type aliases
pub type HmacSha512 = hmac::Hmac<sha2::Sha512>;
pub type Aes256Cbc = block_modes::Cbc<aes::Aes256, block_modes::block_padding::Pkcs7>;
