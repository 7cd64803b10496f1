//! Secret values with memory protection.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, StoreError};

/// A UTF-8 secret that is zeroed on drop.
///
/// `Debug` and `Display` both emit `[REDACTED]` so values never end up in
/// logs by accident.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue {
    inner: String,
}

impl SecretValue {
    /// Create a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Build a secret from caller-supplied bytes.
    ///
    /// Fails with [`StoreError::Encoding`] when the bytes are not UTF-8. The
    /// rejected buffer is zeroed before returning.
    pub fn from_utf8(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes).map(Self::new).map_err(|e| {
            let reason = e.utf8_error().to_string();
            e.into_bytes().zeroize();
            StoreError::Encoding(format!("secret is not valid UTF-8: {reason}"))
        })
    }

    /// Decode bytes read back from the backend.
    ///
    /// Invalid UTF-8 is reported as [`StoreError::Decoding`], never repaired
    /// lossily.
    pub(crate) fn decode(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes).map(Self::new).map_err(|e| {
            let reason = e.utf8_error().to_string();
            e.into_bytes().zeroize();
            StoreError::Decoding(format!("stored data is not valid UTF-8: {reason}"))
        })
    }

    /// Expose the secret value.
    ///
    /// Use sparingly - only when the actual value is needed.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Raw bytes handed to the backend.
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Check if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get the length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

// Never print secrets
impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(self.inner.as_bytes(), other.inner.as_bytes())
    }
}

impl Eq for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
