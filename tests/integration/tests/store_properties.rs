//! Store behaviour against the in-memory backend.
//!
//! Covers what must hold for any backend: reads return the last write,
//! overwrites never duplicate records, and bulk removal stays inside its
//! namespace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use securestore::{
    Attribute, CredentialBackend, GenericPassword, MemoryBackend, OsStatus, Query, Record,
    SecureStore, StoreError,
};
use securestore_integration_tests::{generic_store, internet_store, read};

#[test]
fn test_round_trip_many_keys() {
    let backend = Arc::new(MemoryBackend::new());
    let store = generic_store("someService", &backend);

    let entries = [
        ("plain", "pwd_1234"),
        ("unicode", "pässwörd ✓"),
        ("spaces", "  leading and trailing  "),
        ("empty", ""),
    ];
    for (key, value) in entries {
        store.set_value(key, value).unwrap();
    }
    for (key, value) in entries {
        assert_eq!(read(&store, key).as_deref(), Some(value), "key {}", key);
    }
    assert_eq!(backend.len(), entries.len());
}

#[test]
fn test_repeated_overwrite_keeps_one_record() {
    let backend = Arc::new(MemoryBackend::new());
    let store = generic_store("someService", &backend);

    for i in 0..10 {
        store.set_value("counter", &i.to_string()).unwrap();
    }
    assert_eq!(read(&store, "counter").as_deref(), Some("9"));
    assert_eq!(backend.len(), 1);
}

#[test]
fn test_remove_then_read_is_absent() {
    let backend = Arc::new(MemoryBackend::new());
    let store = internet_store("someServer", &backend);

    store.set_value("internetPassword", "pwd_1234").unwrap();
    store.remove_value("internetPassword").unwrap();
    assert_eq!(read(&store, "internetPassword"), None);
    store.remove_value("internetPassword").unwrap();
}

#[test]
fn test_namespaces_are_isolated() {
    let backend = Arc::new(MemoryBackend::new());
    let generic_a = generic_store("A", &backend);
    let generic_b = generic_store("B", &backend);
    let internet_a = internet_store("A", &backend);

    generic_a.set_value("key", "generic A").unwrap();
    generic_b.set_value("key", "generic B").unwrap();
    internet_a.set_value("key", "internet A").unwrap();
    assert_eq!(backend.len(), 3);

    assert_eq!(read(&generic_a, "key").as_deref(), Some("generic A"));
    assert_eq!(read(&generic_b, "key").as_deref(), Some("generic B"));
    assert_eq!(read(&internet_a, "key").as_deref(), Some("internet A"));

    generic_a.remove_all_values().unwrap();
    assert_eq!(read(&generic_a, "key"), None);
    assert_eq!(read(&generic_b, "key").as_deref(), Some("generic B"));
    assert_eq!(read(&internet_a, "key").as_deref(), Some("internet A"));

    internet_a.remove_all_values().unwrap();
    assert_eq!(read(&generic_b, "key").as_deref(), Some("generic B"));
    assert_eq!(backend.len(), 1);
}

#[test]
fn test_access_group_scopes_namespace() {
    let backend = Arc::new(MemoryBackend::new());
    let shared = SecureStore::new(
        GenericPassword::new("someService").with_access_group("team.shared"),
        backend.clone(),
    );
    let private = generic_store("someService", &backend);

    shared.set_value("token", "shared").unwrap();
    assert_eq!(read(&shared, "token").as_deref(), Some("shared"));

    // Without an access group the query is broader and still finds it.
    assert_eq!(read(&private, "token").as_deref(), Some("shared"));

    private.set_value("other", "private").unwrap();
    assert_eq!(read(&shared, "other"), None);
}

#[test]
fn test_concrete_scenario() {
    let backend = Arc::new(MemoryBackend::new());
    let store = generic_store("someService", &backend);

    store.set_value("genericPassword", "pwd_1234").unwrap();
    assert_eq!(read(&store, "genericPassword").as_deref(), Some("pwd_1234"));

    store.set_value("genericPassword", "pwd_1235").unwrap();
    assert_eq!(read(&store, "genericPassword").as_deref(), Some("pwd_1235"));

    store.set_value("genericPassword2", "pwd_1236").unwrap();
    store.remove_value("genericPassword").unwrap();
    assert_eq!(read(&store, "genericPassword"), None);
    assert_eq!(read(&store, "genericPassword2").as_deref(), Some("pwd_1236"));

    store.remove_all_values().unwrap();
    assert_eq!(read(&store, "genericPassword2"), None);
    assert!(backend.is_empty());
}

/// Lets another writer add the item between the lookup and the add of a
/// write, once.
struct RacingBackend {
    inner: MemoryBackend,
    raced: AtomicBool,
}

impl CredentialBackend for RacingBackend {
    fn add(&self, attributes: &Query, data: &[u8]) -> OsStatus {
        self.inner.add(attributes, data)
    }

    fn copy_matching(&self, query: &Query) -> (OsStatus, Vec<Record>) {
        let result = self.inner.copy_matching(query);
        if !self.raced.swap(true, Ordering::SeqCst) {
            assert_eq!(self.inner.add(query, b"other writer"), OsStatus::SUCCESS);
        }
        result
    }

    fn update(&self, query: &Query, data: &[u8]) -> OsStatus {
        self.inner.update(query, data)
    }

    fn delete(&self, query: &Query) -> OsStatus {
        self.inner.delete(query)
    }
}

#[test]
fn test_concurrent_create_surfaces_duplicate() {
    let backend = Arc::new(RacingBackend {
        inner: MemoryBackend::new(),
        raced: AtomicBool::new(false),
    });
    let store = SecureStore::new(GenericPassword::new("someService"), backend.clone());

    let err = store.set_value("genericPassword", "pwd_1234").unwrap_err();
    assert_eq!(err.status(), Some(OsStatus::DUPLICATE_ITEM));
    assert!(matches!(err, StoreError::StoreUnavailable { .. }));

    // The other writer's value stands; a retry by the caller updates it.
    assert_eq!(read(&store, "genericPassword").as_deref(), Some("other writer"));
    store.set_value("genericPassword", "pwd_1234").unwrap();
    assert_eq!(read(&store, "genericPassword").as_deref(), Some("pwd_1234"));
    assert_eq!(
        backend
            .inner
            .count_matching(&store.queryable().query().with(Attribute::Account, "genericPassword")),
        1
    );
}
