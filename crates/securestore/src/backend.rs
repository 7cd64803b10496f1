//! The platform credential store seam.
//!
//! [`CredentialBackend`] is the capability-limited key-value store the
//! [`SecureStore`](crate::SecureStore) delegates to: add a record, copy the
//! records matching a query, update matching records, delete matching
//! records. Backends report outcomes as raw [`OsStatus`] codes; turning those
//! into errors is the store's job.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroize;

use crate::queryable::Query;

/// Raw status code returned by a credential backend.
///
/// Values follow the platform keychain's `OSStatus` numbering so codes from
/// the real store pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OsStatus(pub i32);

impl OsStatus {
    pub const SUCCESS: OsStatus = OsStatus(0);
    pub const UNIMPLEMENTED: OsStatus = OsStatus(-4);
    pub const DISK_FULL: OsStatus = OsStatus(-34);
    pub const PARAM: OsStatus = OsStatus(-50);
    pub const WRITE_PERMISSION: OsStatus = OsStatus(-61);
    pub const ALLOCATE: OsStatus = OsStatus(-108);
    pub const USER_CANCELED: OsStatus = OsStatus(-128);
    pub const INTERNAL_COMPONENT: OsStatus = OsStatus(-2070);
    pub const NO_ACCESS_FOR_ITEM: OsStatus = OsStatus(-25243);
    pub const NOT_AVAILABLE: OsStatus = OsStatus(-25291);
    pub const AUTH_FAILED: OsStatus = OsStatus(-25293);
    pub const NO_SUCH_KEYCHAIN: OsStatus = OsStatus(-25294);
    pub const DUPLICATE_ITEM: OsStatus = OsStatus(-25299);
    pub const ITEM_NOT_FOUND: OsStatus = OsStatus(-25300);
    pub const INTERACTION_NOT_ALLOWED: OsStatus = OsStatus(-25308);
    pub const DECODE: OsStatus = OsStatus(-26275);
    pub const MISSING_ENTITLEMENT: OsStatus = OsStatus(-34018);

    pub fn code(&self) -> i32 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        *self == Self::SUCCESS
    }

    /// Statuses that usually clear up on their own: a locked store, a
    /// pending or canceled authorization prompt, a store not yet mounted.
    pub fn is_transient(&self) -> bool {
        matches!(
            *self,
            Self::INTERACTION_NOT_ALLOWED
                | Self::AUTH_FAILED
                | Self::USER_CANCELED
                | Self::NOT_AVAILABLE
        )
    }

    /// Human-readable description of well-known codes.
    pub fn description(&self) -> &'static str {
        match *self {
            Self::SUCCESS => "No error",
            Self::UNIMPLEMENTED => "Function or operation not implemented",
            Self::DISK_FULL => "The disk is full",
            Self::PARAM => "One or more parameters passed to a function were not valid",
            Self::WRITE_PERMISSION => "Write permissions error",
            Self::ALLOCATE => "Failed to allocate memory",
            Self::USER_CANCELED => "User canceled the operation",
            Self::INTERNAL_COMPONENT => "An internal component failed",
            Self::NO_ACCESS_FOR_ITEM => "The specified item has no access control",
            Self::NOT_AVAILABLE => "No keychain is available",
            Self::AUTH_FAILED => "The user name or passphrase you entered is not correct",
            Self::NO_SUCH_KEYCHAIN => "The specified keychain could not be found",
            Self::DUPLICATE_ITEM => "The specified item already exists in the keychain",
            Self::ITEM_NOT_FOUND => "The specified item could not be found in the keychain",
            Self::INTERACTION_NOT_ALLOWED => "User interaction is not allowed",
            Self::DECODE => "Unable to decode the provided data",
            Self::MISSING_ENTITLEMENT => "A required entitlement isn't present",
            _ => "Unknown credential store error",
        }
    }
}

impl fmt::Display for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored record: its attributes and its secret payload.
///
/// The payload is zeroed when the record is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Record {
    pub attributes: Query,
    pub data: Vec<u8>,
}

impl Record {
    pub fn new(attributes: Query, data: Vec<u8>) -> Self {
        Self { attributes, data }
    }

    /// Move the payload out, leaving an empty buffer behind.
    pub fn take_data(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

impl Drop for Record {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("attributes", &self.attributes)
            .field("data", &format_args!("[REDACTED; {} bytes]", self.data.len()))
            .finish()
    }
}

/// Primitive operations of a platform credential store.
///
/// All calls are synchronous and may block (for example on an OS
/// authorization prompt). Implementations give no atomicity across calls.
pub trait CredentialBackend: Send + Sync {
    /// Create a record with `attributes` and payload `data`.
    ///
    /// Returns [`OsStatus::DUPLICATE_ITEM`] if a record with the same
    /// identity already exists.
    fn add(&self, attributes: &Query, data: &[u8]) -> OsStatus;

    /// Every record matching `query`.
    ///
    /// Returns [`OsStatus::ITEM_NOT_FOUND`] with no records when nothing
    /// matches. Payloads are loaded for every match where the platform
    /// allows it; the macOS keychain only loads one for a unique match.
    fn copy_matching(&self, query: &Query) -> (OsStatus, Vec<Record>);

    /// Number of records matching `query`, without loading payloads where
    /// the platform allows it.
    ///
    /// Returns [`OsStatus::ITEM_NOT_FOUND`] with zero when nothing matches.
    fn count(&self, query: &Query) -> (OsStatus, usize) {
        let (status, records) = self.copy_matching(query);
        (status, records.len())
    }

    /// Replace the payload of every record matching `query`.
    fn update(&self, query: &Query, data: &[u8]) -> OsStatus;

    /// Delete every record matching `query`.
    fn delete(&self, query: &Query) -> OsStatus;

    /// Human-readable message for `status`, used in error reports.
    fn status_message(&self, status: OsStatus) -> String {
        status.description().to_string()
    }
}

/// Repeat `delete_once` until nothing matches any more.
///
/// For stores that remove a single match per call. The first status is
/// returned as is unless it is success; later rounds end on
/// [`OsStatus::ITEM_NOT_FOUND`], and any other failure is returned. Still
/// deleting after `max_rounds` extra rounds yields
/// [`OsStatus::INTERNAL_COMPONENT`].
pub(crate) fn delete_repeatedly(
    max_rounds: usize,
    mut delete_once: impl FnMut() -> OsStatus,
) -> OsStatus {
    let first = delete_once();
    if !first.is_success() {
        return first;
    }

    for _ in 0..max_rounds {
        match delete_once() {
            OsStatus::SUCCESS => continue,
            OsStatus::ITEM_NOT_FOUND => return OsStatus::SUCCESS,
            other => return other,
        }
    }
    tracing::warn!(max_rounds, "records still matching after repeated deletes");
    OsStatus::INTERNAL_COMPONENT
}

/// Backend for platforms without a supported credential store.
///
/// Every call reports [`OsStatus::UNIMPLEMENTED`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedBackend;

impl CredentialBackend for UnsupportedBackend {
    fn add(&self, _attributes: &Query, _data: &[u8]) -> OsStatus {
        OsStatus::UNIMPLEMENTED
    }

    fn copy_matching(&self, _query: &Query) -> (OsStatus, Vec<Record>) {
        (OsStatus::UNIMPLEMENTED, Vec::new())
    }

    fn update(&self, _query: &Query, _data: &[u8]) -> OsStatus {
        OsStatus::UNIMPLEMENTED
    }

    fn delete(&self, _query: &Query) -> OsStatus {
        OsStatus::UNIMPLEMENTED
    }

    fn status_message(&self, status: OsStatus) -> String {
        if status == OsStatus::UNIMPLEMENTED {
            format!(
                "no credential store backend for {}; only macOS is supported",
                std::env::consts::OS
            )
        } else {
            status.description().to_string()
        }
    }
}

/// The platform credential store: the login keychain on macOS.
#[cfg(target_os = "macos")]
pub fn default_backend() -> Arc<dyn CredentialBackend> {
    Arc::new(crate::keychain::KeychainBackend::new())
}

/// The platform credential store. Not available here, so every call fails
/// with [`OsStatus::UNIMPLEMENTED`].
#[cfg(not(target_os = "macos"))]
pub fn default_backend() -> Arc<dyn CredentialBackend> {
    tracing::warn!(
        os = std::env::consts::OS,
        "no platform credential store backend; operations will fail"
    );
    Arc::new(UnsupportedBackend)
}
