//! Authoritative contact collection and its persistence synchronization.
//!
//! # Responsibility
//! - Hold the in-memory contact collection for one session.
//! - Mirror every mutation to the storage adapter as a full snapshot.
//! - Push change notifications to subscribers.
//!
//! # Invariants
//! - In-memory state is the source of truth; storage failures never surface
//!   as caller errors and never roll state back.
//! - Contact ids are unique within the collection.

pub mod codec;
pub mod contact_store;

pub use codec::PersistenceError;
pub use contact_store::{ContactStore, StoreOptions, SubscriptionId, DEFAULT_STORAGE_KEY};
