use contacts_core::{
    Contact, ContactStore, CreateContactDto, KeyValueStorage, MemoryStorage, StorageError,
    StorageResult, StoreOptions, UpdateContactDto, DEFAULT_STORAGE_KEY,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

fn dto(name: &str, email: &str, phone: &str) -> CreateContactDto {
    CreateContactDto::new(name, email, phone)
}

fn stored_contacts(storage: &MemoryStorage) -> Vec<Contact> {
    let raw = storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

/// Reads succeed, writes always fail.
#[derive(Default)]
struct ReadOnlyStorage {
    inner: MemoryStorage,
    write_attempts: Cell<usize>,
}

impl KeyValueStorage for ReadOnlyStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

/// Every read fails.
struct BrokenReadStorage;

impl KeyValueStorage for BrokenReadStorage {
    fn get_item(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }
}

#[test]
fn starts_empty_when_no_record_exists() {
    let storage = MemoryStorage::new();
    let store = ContactStore::with_storage(&storage);

    assert_eq!(store.count(), 0);
    assert!(store.list().is_empty());
    assert!(store.is_persistent());
    // Loading never writes.
    assert!(storage.is_empty());
}

#[test]
fn corrupt_record_starts_empty_and_stays_usable() {
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "[{\"id\": 1");
    let mut store = ContactStore::with_storage(&storage);
    assert_eq!(store.count(), 0);

    let created = store.add(dto("Ana", "ana@x.com", "+34600111222"));
    assert_eq!(stored_contacts(&storage), vec![created]);
}

#[test]
fn record_with_missing_fields_is_treated_as_corrupt() {
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, r#"[{"id":"a","name":"Ana"}]"#);
    let store = ContactStore::with_storage(&storage);
    assert_eq!(store.count(), 0);
}

#[test]
fn unreadable_storage_starts_empty() {
    let store = ContactStore::with_storage(BrokenReadStorage);
    assert_eq!(store.count(), 0);
}

#[test]
fn scenario_add_update_delete() {
    let storage = MemoryStorage::new();
    let mut store = ContactStore::with_storage(&storage);

    let bob = store.add(dto("Bob", "b@x.com", "123"));
    assert!(!bob.id.is_empty());
    assert_eq!(store.count(), 1);
    assert_eq!(store.get(&bob.id), Some(&bob));

    let patch = UpdateContactDto {
        name: Some("Bobby".to_string()),
        ..UpdateContactDto::default()
    };
    let bobby = store.update(&bob.id, patch).unwrap();
    assert_eq!(bobby.name, "Bobby");
    assert_eq!(bobby.email, "b@x.com");
    assert_eq!(bobby.phone, "123");
    assert_eq!(bobby.id, bob.id);
    assert_eq!(bobby.created_at, bob.created_at);
    assert_eq!(stored_contacts(&storage), vec![bobby.clone()]);

    assert!(store.delete(&bob.id));
    assert_eq!(store.count(), 0);
    assert!(stored_contacts(&storage).is_empty());
}

#[test]
fn add_appends_in_insertion_order_with_fresh_ids() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    let mut seen = HashSet::new();

    for index in 0..50 {
        let before = store.list().iter().map(|c| c.id.clone()).collect::<HashSet<_>>();
        let created = store.add(dto(&format!("Person {index}"), "p@x.com", "1"));
        assert!(!before.contains(&created.id));
        assert!(seen.insert(created.id.clone()));
    }

    let names = store.list().iter().map(|c| c.name.clone()).collect::<Vec<_>>();
    let expected = (0..50).map(|i| format!("Person {i}")).collect::<Vec<_>>();
    assert_eq!(names, expected);
}

#[test]
fn update_unknown_id_changes_nothing() {
    let storage = MemoryStorage::new();
    let mut store = ContactStore::with_storage(&storage);
    store.add(dto("Ana", "ana@x.com", "1"));
    let before = store.list().to_vec();
    let persisted_before = storage.get_item(DEFAULT_STORAGE_KEY).unwrap();

    let result = store.update("missing", UpdateContactDto::from(dto("X", "x@x.com", "9")));

    assert!(result.is_none());
    assert_eq!(store.list(), before.as_slice());
    assert_eq!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap(), persisted_before);
}

#[test]
fn update_keeps_position_and_identity() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    let first = store.add(dto("First", "f@x.com", "1"));
    let middle = store.add(dto("Middle", "m@x.com", "2"));
    let last = store.add(dto("Last", "l@x.com", "3"));

    let updated = store
        .update(&middle.id, UpdateContactDto::from(dto("Changed", "c@x.com", "22")))
        .unwrap();

    assert_eq!(updated.id, middle.id);
    assert_eq!(updated.created_at, middle.created_at);
    let ids = store.list().iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id.as_str(), middle.id.as_str(), last.id.as_str()]);
    assert_eq!(store.list()[1].email, "c@x.com");
}

#[test]
fn delete_unknown_id_returns_false_and_keeps_count() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    store.add(dto("Ana", "ana@x.com", "1"));

    assert!(!store.delete("missing"));
    assert_eq!(store.count(), 1);
}

#[test]
fn delete_existing_id_decrements_count_by_one() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    let a = store.add(dto("A", "a@x.com", "1"));
    store.add(dto("B", "b@x.com", "2"));

    assert!(store.delete(&a.id));
    assert_eq!(store.count(), 1);
    assert!(store.get(&a.id).is_none());
    assert!(!store.delete(&a.id));
}

#[test]
fn clear_all_always_empties_and_persists() {
    let storage = MemoryStorage::new();
    let mut store = ContactStore::with_storage(&storage);

    store.clear_all();
    assert_eq!(store.count(), 0);
    assert!(stored_contacts(&storage).is_empty());

    store.add(dto("A", "a@x.com", "1"));
    store.add(dto("B", "b@x.com", "2"));
    store.clear_all();
    assert_eq!(store.count(), 0);
    assert!(stored_contacts(&storage).is_empty());
}

#[test]
fn count_tracks_list_length_across_mixed_operations() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    let mut ids = Vec::new();

    for step in 0..30usize {
        match step % 4 {
            0 | 1 => ids.push(store.add(dto(&format!("C{step}"), "c@x.com", "1")).id),
            2 => {
                if let Some(id) = ids.first() {
                    store.update(id, UpdateContactDto::from(dto("U", "u@x.com", "2")));
                }
            }
            _ => {
                if let Some(id) = ids.pop() {
                    assert!(store.delete(&id));
                }
            }
        }
        assert_eq!(store.count(), store.list().len());
    }
}

#[test]
fn reload_round_trips_ids_fields_and_timestamps() {
    let storage = MemoryStorage::new();
    let original = {
        let mut store = ContactStore::with_storage(&storage);
        store.add(dto("Ana Gomez", "ana@x.com", "+34600111222"));
        store.add(dto("Bob", "b@x.com", "123"));
        let carol = store.add(dto("Carol", "c@x.com", "456"));
        store.update(
            &carol.id,
            UpdateContactDto {
                phone: Some("789".to_string()),
                ..UpdateContactDto::default()
            },
        );
        store.list().to_vec()
    };

    let reloaded = ContactStore::with_storage(&storage);
    assert_eq!(reloaded.list(), original.as_slice());
}

#[test]
fn persisted_layout_uses_camel_case_and_iso_timestamps() {
    let storage = MemoryStorage::new();
    let mut store = ContactStore::with_storage(&storage);
    store.add(dto("Ana", "ana@x.com", "1"));

    let raw = storage.get_item(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value.as_array().unwrap()[0];
    let created_at = first["createdAt"].as_str().unwrap();

    assert!(first.get("id").is_some());
    assert!(first.get("created_at").is_none());
    assert!(created_at.ends_with('Z'));
    assert_eq!(created_at.len(), "2024-05-01T10:20:30.123Z".len());
}

#[test]
fn loads_collections_written_by_other_clients() {
    let raw = r#"[
        {"id":"lx1abc","name":"Ana Gomez","email":"ana@x.com","phone":"+34600111222","createdAt":"2024-05-01T10:20:30.123Z"},
        {"id":"lx2def","name":"Bob","email":"b@x.com","phone":"123","createdAt":"2024-05-02T08:00:00.000Z"}
    ]"#;
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, raw);
    let store = ContactStore::with_storage(&storage);

    assert_eq!(store.count(), 2);
    assert_eq!(store.list()[0].id, "lx1abc");
    assert_eq!(store.list()[1].name, "Bob");
    assert_eq!(store.list()[0].created_at.timestamp_millis() % 1000, 123);
}

#[test]
fn duplicate_ids_in_storage_keep_first_occurrence() {
    let raw = r#"[
        {"id":"same","name":"First","email":"a@x.com","phone":"1","createdAt":"2024-05-01T10:20:30.123Z"},
        {"id":"same","name":"Second","email":"b@x.com","phone":"2","createdAt":"2024-05-01T10:20:31.000Z"}
    ]"#;
    let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, raw);
    let store = ContactStore::with_storage(&storage);

    assert_eq!(store.count(), 1);
    assert_eq!(store.list()[0].name, "First");
}

#[test]
fn custom_storage_key_is_used_for_load_and_save() {
    let storage = MemoryStorage::new();
    let options = StoreOptions {
        storage_key: "work-contacts".to_string(),
    };
    let mut store = ContactStore::open(Some(&storage), options.clone());
    store.add(dto("Ana", "ana@x.com", "1"));

    assert_eq!(store.storage_key(), "work-contacts");
    assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    let reloaded = ContactStore::open(Some(&storage), options);
    assert_eq!(reloaded.count(), 1);
}

#[test]
fn failed_writes_keep_in_memory_state() {
    let storage = ReadOnlyStorage::default();
    let mut store = ContactStore::with_storage(&storage);

    let ana = store.add(dto("Ana", "ana@x.com", "1"));
    store.add(dto("Bob", "b@x.com", "2"));
    let updated = store.update(&ana.id, UpdateContactDto::from(dto("Ana M", "ana@x.com", "1")));

    assert!(updated.is_some());
    assert_eq!(store.count(), 2);
    assert_eq!(store.list()[0].name, "Ana M");
    assert_eq!(storage.write_attempts.get(), 3);
}

#[test]
fn in_memory_only_store_never_writes() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    store.add(dto("Ana", "ana@x.com", "1"));
    store.clear_all();

    assert!(!store.is_persistent());
    assert!(store.storage().is_none());
    assert_eq!(store.count(), 0);
}

#[test]
fn search_matches_name_email_and_phone() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    let ana = store.add(dto("Ana Gomez", "ana@x.com", "+34600111222"));
    let bob = store.add(dto("Bob", "BOB@Work.org", "555"));

    let by_name = store.search("ANA");
    assert_eq!(by_name, vec![&ana]);

    let by_email = store.search("work.ORG");
    assert_eq!(by_email, vec![&bob]);

    let by_phone = store.search("600111");
    assert_eq!(by_phone, vec![&ana]);

    assert!(store.search("999").is_empty());
}

#[test]
fn blank_search_returns_full_list_in_order() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    store.add(dto("Zed", "z@x.com", "1"));
    store.add(dto("Amy", "a@x.com", "2"));

    let everything = store.list().iter().collect::<Vec<_>>();
    assert_eq!(store.search(""), everything);
    assert_eq!(store.search("   "), everything);
}

#[test]
fn subscribers_see_every_mutation_until_unsubscribed() {
    let mut store = ContactStore::<MemoryStorage>::in_memory_only();
    let counts = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    let subscription = store.subscribe(move |contacts| sink.borrow_mut().push(contacts.len()));

    let ana = store.add(dto("Ana", "ana@x.com", "1"));
    store.add(dto("Bob", "b@x.com", "2"));
    store.update(&ana.id, UpdateContactDto::default());
    store.update("missing", UpdateContactDto::default());
    store.delete("missing");
    store.delete(&ana.id);
    store.clear_all();

    assert_eq!(*counts.borrow(), vec![1, 2, 2, 1, 0]);

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.add(dto("Carol", "c@x.com", "3"));
    assert_eq!(counts.borrow().len(), 5);
}

#[test]
fn loading_does_not_notify() {
    let storage = MemoryStorage::new();
    {
        let mut store = ContactStore::with_storage(&storage);
        store.add(dto("Ana", "ana@x.com", "1"));
    }

    let notified = Rc::new(Cell::new(0));
    let mut store = ContactStore::with_storage(&storage);
    let counter = Rc::clone(&notified);
    store.subscribe(move |_| counter.set(counter.get() + 1));

    assert_eq!(store.count(), 1);
    assert_eq!(notified.get(), 0);
}
