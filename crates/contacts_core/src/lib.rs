//! Core domain logic for the contacts manager.
//! This crate owns the contact collection, its persistence and search rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, CreateContactDto, UpdateContactDto};
pub use model::validation::{ContactField, ContactValidationError};
pub use search::filter::search_contacts;
pub use service::contacts_session::{ContactsSession, SubmitOutcome};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};
pub use store::{ContactStore, PersistenceError, StoreOptions, SubscriptionId, DEFAULT_STORAGE_KEY};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
