// Declare all modules
pub mod encryption;
pub mod provider;
pub mod utils;

// No re-exports here as they're handled in lib.rs
