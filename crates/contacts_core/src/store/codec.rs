//! Persisted collection format.
//!
//! One storage key holds a JSON array of contacts (see `model::contact` for
//! the element shape).

use crate::model::contact::Contact;
use crate::storage::{KeyValueStorage, StorageError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while reading or writing the persisted collection.
#[derive(Debug)]
pub enum PersistenceError {
    Read(StorageError),
    Write(StorageError),
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl PersistenceError {
    /// Stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read(_) => "storage_read_failed",
            Self::Write(_) => "storage_write_failed",
            Self::Decode(_) => "decode_failed",
            Self::Encode(_) => "encode_failed",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "failed to read contacts: {err}"),
            Self::Write(err) => write!(f, "failed to write contacts: {err}"),
            Self::Decode(err) => write!(f, "stored contacts are malformed: {err}"),
            Self::Encode(err) => write!(f, "failed to serialize contacts: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) | Self::Write(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
        }
    }
}

pub fn encode_contacts(contacts: &[Contact]) -> Result<String, PersistenceError> {
    serde_json::to_string(contacts).map_err(PersistenceError::Encode)
}

pub fn decode_contacts(raw: &str) -> Result<Vec<Contact>, PersistenceError> {
    serde_json::from_str(raw).map_err(PersistenceError::Decode)
}

/// Reads the collection stored under `key`.
///
/// Returns `Ok(None)` when the key is absent or holds an empty value.
pub fn read_collection<S>(storage: &S, key: &str) -> Result<Option<Vec<Contact>>, PersistenceError>
where
    S: KeyValueStorage + ?Sized,
{
    let raw = storage.get_item(key).map_err(PersistenceError::Read)?;
    match raw {
        Some(value) if !value.trim().is_empty() => decode_contacts(&value).map(Some),
        _ => Ok(None),
    }
}

/// Replaces the collection stored under `key` with `contacts`.
pub fn write_collection<S>(
    storage: &S,
    key: &str,
    contacts: &[Contact],
) -> Result<(), PersistenceError>
where
    S: KeyValueStorage + ?Sized,
{
    let encoded = encode_contacts(contacts)?;
    storage
        .set_item(key, &encoded)
        .map_err(PersistenceError::Write)
}
