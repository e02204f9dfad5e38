pub mod cipher;
pub mod config;
pub mod error;
pub mod search;

pub use cipher::FieldCipher;
pub use config::ProviderOptions;
pub use error::FieldCipherError;
pub use search::{search, Record};
