//! Contact store: in-memory collection, snapshot persistence, change feed.
//!
//! # Responsibility
//! - Provide list/get/search reads and add/update/delete/clear mutations.
//! - Write the full collection after each successful mutation.
//! - Notify subscribers after each successful mutation.
//!
//! # Invariants
//! - Collection order is insertion order; load and clear replace it whole.
//! - `id` and `created_at` never change after `add`.
//! - Not-found is an `Option`/`bool` result, never an error.
//! - Startup never fails: unreadable storage yields an empty collection.

use crate::model::contact::{generate_contact_id, Contact, CreateContactDto, UpdateContactDto};
use crate::search::filter::search_contacts;
use crate::storage::KeyValueStorage;
use crate::store::codec::{read_collection, write_collection};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "contacts";

/// Handle returned by [`ContactStore::subscribe`].
pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&[Contact])>;

/// Construction options for [`ContactStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key the collection is persisted under.
    pub storage_key: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Owner of the authoritative contact collection for one session.
///
/// `storage = None` runs the store in memory only: nothing is loaded and
/// nothing is written.
pub struct ContactStore<S: KeyValueStorage> {
    contacts: Vec<Contact>,
    storage: Option<S>,
    storage_key: String,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_subscription_id: SubscriptionId,
}

impl<S: KeyValueStorage> ContactStore<S> {
    /// Opens a store, loading any collection persisted under the configured key.
    ///
    /// # Side effects
    /// - Reads storage once.
    /// - Logs `contacts_load` with the outcome; corrupt data is logged at
    ///   error level and replaced by an empty collection in memory.
    pub fn open(storage: Option<S>, options: StoreOptions) -> Self {
        let contacts = match storage.as_ref() {
            Some(storage) => load_contacts(storage, &options.storage_key),
            None => {
                info!("event=contacts_load module=store status=skipped reason=no_storage");
                Vec::new()
            }
        };

        Self {
            contacts,
            storage,
            storage_key: options.storage_key,
            subscribers: BTreeMap::new(),
            next_subscription_id: 1,
        }
    }

    /// Opens a store over `storage` with the default key.
    pub fn with_storage(storage: S) -> Self {
        Self::open(Some(storage), StoreOptions::default())
    }

    /// Creates a store that never touches storage.
    pub fn in_memory_only() -> Self {
        Self::open(None, StoreOptions::default())
    }

    /// Current collection in store order.
    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn count(&self) -> usize {
        self.contacts.len()
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    /// Contacts matching `term` (see `search::filter`); blank terms return
    /// the whole collection.
    pub fn search(&self, term: &str) -> Vec<&Contact> {
        search_contacts(&self.contacts, term)
    }

    /// Whether mutations are written to a storage adapter.
    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn storage(&self) -> Option<&S> {
        self.storage.as_ref()
    }

    /// Appends a new contact built from `dto` and returns it.
    ///
    /// Field contents are not validated here.
    pub fn add(&mut self, dto: CreateContactDto) -> Contact {
        let mut contact = Contact::new(dto);
        while self.position(&contact.id).is_some() {
            warn!("event=contact_id_collision module=store status=retry");
            contact.id = generate_contact_id();
        }

        self.contacts.push(contact.clone());
        self.commit("add");
        contact
    }

    /// Overwrites the supplied fields of contact `id` in place.
    ///
    /// Returns `None` and changes nothing when `id` is unknown.
    pub fn update(&mut self, id: &str, patch: UpdateContactDto) -> Option<Contact> {
        let contact = self.contacts.iter_mut().find(|contact| contact.id == id)?;
        contact.apply(patch);
        let updated = contact.clone();

        self.commit("update");
        Some(updated)
    }

    /// Removes contact `id`; returns whether it existed.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };

        self.contacts.remove(index);
        self.commit("delete");
        true
    }

    /// Removes every contact and persists the empty collection.
    pub fn clear_all(&mut self) {
        self.contacts.clear();
        self.commit("clear_all");
    }

    /// Registers a callback invoked with the full collection after every
    /// successful mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&[Contact]) + 'static,
    {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.subscribers.insert(id, Box::new(callback));
        id
    }

    /// Drops a subscription; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.contacts.iter().position(|contact| contact.id == id)
    }

    fn commit(&mut self, operation: &'static str) {
        self.persist(operation);
        self.notify();
    }

    fn persist(&self, operation: &'static str) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };

        let started_at = Instant::now();
        match write_collection(storage, &self.storage_key, &self.contacts) {
            Ok(()) => debug!(
                "event=contacts_save module=store status=ok op={operation} count={} duration_ms={}",
                self.contacts.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=contacts_save module=store status=error op={operation} count={} error_code={} error={err}",
                self.contacts.len(),
                err.code()
            ),
        }
    }

    fn notify(&mut self) {
        let contacts = &self.contacts;
        for subscriber in self.subscribers.values_mut() {
            subscriber(contacts);
        }
    }
}

fn load_contacts<S: KeyValueStorage>(storage: &S, key: &str) -> Vec<Contact> {
    let started_at = Instant::now();
    match read_collection(storage, key) {
        Ok(Some(stored)) => {
            let (contacts, dropped) = dedupe_by_id(stored);
            if dropped > 0 {
                warn!(
                    "event=contacts_load module=store status=repaired duplicate_ids_dropped={dropped}"
                );
            }
            info!(
                "event=contacts_load module=store status=ok count={} duration_ms={}",
                contacts.len(),
                started_at.elapsed().as_millis()
            );
            contacts
        }
        Ok(None) => {
            info!("event=contacts_load module=store status=ok count=0 reason=no_record");
            Vec::new()
        }
        Err(err) => {
            error!(
                "event=contacts_load module=store status=error error_code={} error={err}",
                err.code()
            );
            Vec::new()
        }
    }
}

/// Keeps the first contact for each id; returns survivors and drop count.
fn dedupe_by_id(contacts: Vec<Contact>) -> (Vec<Contact>, usize) {
    let total = contacts.len();
    let mut seen = HashSet::with_capacity(total);
    let kept = contacts
        .into_iter()
        .filter(|contact| seen.insert(contact.id.clone()))
        .collect::<Vec<_>>();
    let dropped = total - kept.len();
    (kept, dropped)
}
