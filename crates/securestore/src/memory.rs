//! In-process credential backend.
//!
//! [`MemoryBackend`] follows keychain matching rules: a query selects every
//! record whose attributes include all of the query's attributes, and adding
//! a record whose attribute set already exists fails with
//! [`OsStatus::DUPLICATE_ITEM`]. Nothing is persisted.

use parking_lot::Mutex;
use tracing::trace;
use zeroize::Zeroize;

use crate::backend::{CredentialBackend, OsStatus, Record};
use crate::queryable::{Attribute, Query};

/// A credential backend held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<Vec<Record>>,
    forced_status: Mutex<Option<OsStatus>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all namespaces.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Number of records matching `query`.
    pub fn count_matching(&self, query: &Query) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| query.is_subset_of(&r.attributes))
            .count()
    }

    /// Store a record without the duplicate check, e.g. to reproduce a store
    /// that already holds two records for one item key.
    pub fn insert_unchecked(&self, attributes: Query, data: &[u8]) {
        self.records.lock().push(Record::new(attributes, data.to_vec()));
    }

    /// Make every subsequent call fail with `status` until cleared with `None`.
    pub fn force_status(&self, status: Option<OsStatus>) {
        *self.forced_status.lock() = status;
    }

    fn forced(&self) -> Option<OsStatus> {
        *self.forced_status.lock()
    }
}

/// A query must at least name a record class, as the keychain requires.
fn check_query(query: &Query) -> Result<(), OsStatus> {
    if query.class().is_none() {
        return Err(OsStatus::PARAM);
    }
    Ok(())
}

impl CredentialBackend for MemoryBackend {
    fn add(&self, attributes: &Query, data: &[u8]) -> OsStatus {
        if let Some(status) = self.forced() {
            return status;
        }
        if let Err(status) = check_query(attributes) {
            return status;
        }

        let mut records = self.records.lock();
        if records.iter().any(|r| r.attributes == *attributes) {
            return OsStatus::DUPLICATE_ITEM;
        }

        trace!(
            account = attributes.text(Attribute::Account),
            "memory backend: add"
        );
        records.push(Record::new(attributes.clone(), data.to_vec()));
        OsStatus::SUCCESS
    }

    fn copy_matching(&self, query: &Query) -> (OsStatus, Vec<Record>) {
        if let Some(status) = self.forced() {
            return (status, Vec::new());
        }
        if let Err(status) = check_query(query) {
            return (status, Vec::new());
        }

        let matches: Vec<Record> = self
            .records
            .lock()
            .iter()
            .filter(|r| query.is_subset_of(&r.attributes))
            .cloned()
            .collect();

        if matches.is_empty() {
            (OsStatus::ITEM_NOT_FOUND, matches)
        } else {
            (OsStatus::SUCCESS, matches)
        }
    }

    fn update(&self, query: &Query, data: &[u8]) -> OsStatus {
        if let Some(status) = self.forced() {
            return status;
        }
        if let Err(status) = check_query(query) {
            return status;
        }

        let mut updated = 0usize;
        for record in self
            .records
            .lock()
            .iter_mut()
            .filter(|r| query.is_subset_of(&r.attributes))
        {
            record.data.zeroize();
            record.data.extend_from_slice(data);
            updated += 1;
        }

        if updated == 0 {
            OsStatus::ITEM_NOT_FOUND
        } else {
            OsStatus::SUCCESS
        }
    }

    fn delete(&self, query: &Query) -> OsStatus {
        if let Some(status) = self.forced() {
            return status;
        }
        if let Err(status) = check_query(query) {
            return status;
        }

        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| !query.is_subset_of(&r.attributes));

        if records.len() == before {
            OsStatus::ITEM_NOT_FOUND
        } else {
            trace!(removed = before - records.len(), "memory backend: delete");
            OsStatus::SUCCESS
        }
    }
}
