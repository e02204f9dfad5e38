use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A record that exposes its fields by name.
pub trait Record {
    /// Stored value of `name`, or `None` when the record has no such field
    fn field(&self, name: &str) -> Option<&str>;
}

impl Record for HashMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

// Only string-valued fields are visible; numbers, nulls and nested values
// never match.
impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<&str> {
        self.as_object().and_then(|object| object.field(name))
    }
}

/// Lazily yield every record whose `field` equals `criteria` byte for byte.
///
/// Values are compared exactly as stored. Searching an encrypted column
/// therefore needs ciphertext criteria produced with the same key.
pub fn search<'a, 'q, R, I>(
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
    records
        .into_iter()
        .filter(move |record| record.field(field) == Some(criteria))
}
