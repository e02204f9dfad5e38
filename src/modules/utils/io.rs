use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

use crate::modules::provider::error::FieldCipherError;

/// Helper function to read a passphrase without echoing it
pub fn read_passphrase(prompt: &str) -> io::Result<String> {
    eprintln!("{}", prompt);
    rpassword::read_password()
}

/// Load a record collection from a JSON file
///
/// Accepts either a top-level array of objects or JSON Lines (one object per
/// line).
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Value>, FieldCipherError> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_records(&contents)
}

fn parse_records(contents: &str) -> Result<Vec<Value>, FieldCipherError> {
    if contents.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(contents)?);
    }

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(FieldCipherError::from))
        .collect()
}
