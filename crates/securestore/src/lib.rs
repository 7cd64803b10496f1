//! Uniform access to the platform credential store.
//!
//! A [`Queryable`] describes a credential namespace (a generic-password
//! service, or an internet-password endpoint). A [`SecureStore`] pairs one
//! queryable with a [`CredentialBackend`] and offers set/get/remove/remove-all
//! over the secrets in that namespace, keyed by item key.
//!
//! ```no_run
//! use securestore::{GenericPassword, SecureStore};
//!
//! let store = SecureStore::with_default_backend(GenericPassword::new("someService"));
//! store.set_value("genericPassword", "pwd_1234")?;
//! let value = store.get_value("genericPassword")?;
//! assert_eq!(value.as_ref().map(|v| v.expose()), Some("pwd_1234"));
//! # Ok::<(), securestore::StoreError>(())
//! ```

pub mod backend;
pub mod error;
#[cfg(target_os = "macos")]
pub mod keychain;
pub mod memory;
pub mod queryable;
pub mod store;
pub mod value;

pub use backend::{default_backend, CredentialBackend, OsStatus, Record, UnsupportedBackend};
pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
pub use queryable::{
    Attribute, AttributeValue, AuthenticationType, GenericPassword, InternetPassword, ItemClass,
    Protocol, Query, Queryable,
};
pub use store::SecureStore;
pub use value::SecretValue;
