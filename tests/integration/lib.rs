//! Shared fixtures for the integration tests.

use std::sync::Arc;

use securestore::{
    AuthenticationType, GenericPassword, InternetPassword, MemoryBackend, Protocol, SecureStore,
};

/// A generic-password store for `service` over `backend`.
pub fn generic_store(service: &str, backend: &Arc<MemoryBackend>) -> SecureStore {
    SecureStore::new(GenericPassword::new(service), backend.clone())
}

/// An internet-password store for `server` over `backend`, using the
/// port, path and domain the scenario tests share.
pub fn internet_store(server: &str, backend: &Arc<MemoryBackend>) -> SecureStore {
    SecureStore::new(
        InternetPassword::new(
            server,
            8080,
            "somePath",
            "someDomain",
            Protocol::Https,
            AuthenticationType::HttpBasic,
        ),
        backend.clone(),
    )
}

/// Read `key` as a plain string.
pub fn read(store: &SecureStore, key: &str) -> Option<String> {
    store
        .get_value(key)
        .expect("read should succeed")
        .map(|value| value.expose().to_string())
}
