//! CRUD over one credential namespace.
//!
//! [`SecureStore`] owns a [`Queryable`] and a [`CredentialBackend`]. Each call
//! builds the namespace query, adds the item key as the record's account
//! attribute, and issues the matching backend primitive.
//!
//! Writes are find-then-branch: look the item up, then update it if present
//! or add it if not. The two steps are separate backend calls, so another
//! writer creating the same item in between makes the add fail with
//! [`OsStatus::DUPLICATE_ITEM`], reported as
//! [`StoreError::StoreUnavailable`]. The store does not retry.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::{default_backend, CredentialBackend, OsStatus};
use crate::error::{Result, StoreError};
use crate::queryable::{Attribute, Query, Queryable};
use crate::value::SecretValue;

/// Secrets of one namespace, keyed by item key.
#[derive(Clone)]
pub struct SecureStore {
    queryable: Queryable,
    backend: Arc<dyn CredentialBackend>,
}

impl SecureStore {
    /// Create a store over `queryable`'s namespace in `backend`.
    pub fn new(queryable: impl Into<Queryable>, backend: Arc<dyn CredentialBackend>) -> Self {
        Self {
            queryable: queryable.into(),
            backend,
        }
    }

    /// Create a store backed by the platform credential store.
    pub fn with_default_backend(queryable: impl Into<Queryable>) -> Self {
        Self::new(queryable, default_backend())
    }

    pub fn queryable(&self) -> &Queryable {
        &self.queryable
    }

    /// Store `value` under `key`, replacing any existing value.
    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let query = self.item_query(key);
        let class = self.queryable.class();

        // Only existence matters here; the payload is not loaded.
        let (status, count) = self.backend.count(&query);
        match status {
            OsStatus::SUCCESS if count > 0 => {
                ensure_unique(key, count)?;
                debug!(%class, key, "updating existing item");
                let status = self.backend.update(&query, value.as_bytes());
                self.check(status, "update")
            }
            OsStatus::SUCCESS | OsStatus::ITEM_NOT_FOUND => {
                debug!(%class, key, "adding new item");
                let status = self.backend.add(&query, value.as_bytes());
                self.check(status, "add")
            }
            other => Err(self.unavailable(other, "lookup")),
        }
    }

    /// Read the value stored under `key`, or `None` if there is none.
    pub fn get_value(&self, key: &str) -> Result<Option<SecretValue>> {
        let query = self.item_query(key);
        debug!(class = %self.queryable.class(), key, "reading item");

        let (status, mut records) = self.backend.copy_matching(&query);
        match status {
            OsStatus::SUCCESS => {
                ensure_unique(key, records.len())?;
                match records.first_mut() {
                    Some(record) => SecretValue::decode(record.take_data()).map(Some),
                    None => Ok(None),
                }
            }
            OsStatus::ITEM_NOT_FOUND => Ok(None),
            other => Err(self.unavailable(other, "lookup")),
        }
    }

    /// Delete the value stored under `key`. Deleting a missing item is not an
    /// error.
    pub fn remove_value(&self, key: &str) -> Result<()> {
        let query = self.item_query(key);
        debug!(class = %self.queryable.class(), key, "removing item");

        let status = self.backend.delete(&query);
        self.check_delete(status)
    }

    /// Delete every value in this store's namespace, and nothing outside it.
    pub fn remove_all_values(&self) -> Result<()> {
        let query = self.queryable.query();
        debug!(namespace = %self.queryable, "removing all items");

        let status = self.backend.delete(&query);
        self.check_delete(status)
    }

    fn item_query(&self, key: &str) -> Query {
        self.queryable.query().with(Attribute::Account, key)
    }

    fn check(&self, status: OsStatus, op: &str) -> Result<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(self.unavailable(status, op))
        }
    }

    fn check_delete(&self, status: OsStatus) -> Result<()> {
        match status {
            OsStatus::SUCCESS | OsStatus::ITEM_NOT_FOUND => Ok(()),
            other => Err(self.unavailable(other, "delete")),
        }
    }

    fn unavailable(&self, status: OsStatus, op: &str) -> StoreError {
        let message = self.backend.status_message(status);
        warn!(
            namespace = %self.queryable,
            status = status.code(),
            op,
            "credential store rejected call: {message}"
        );
        StoreError::StoreUnavailable { status, message }
    }
}

impl std::fmt::Debug for SecureStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureStore")
            .field("queryable", &self.queryable)
            .finish_non_exhaustive()
    }
}

/// More than one record per item key means the store was written outside
/// this crate; report it instead of picking one.
fn ensure_unique(key: &str, count: usize) -> Result<()> {
    if count > 1 {
        return Err(StoreError::Ambiguous {
            key: key.to_string(),
            count,
        });
    }
    Ok(())
}
