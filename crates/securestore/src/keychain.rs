//! macOS keychain backend.
//!
//! Maps [`Query`] attribute sets onto `SecItem*` dictionaries. Protocol and
//! authentication type values use their four-character codes, which is how
//! the keychain stores them.

use core_foundation::array::CFArray;
use core_foundation::base::{CFType, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::data::CFData;
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};
use security_framework_sys::item::{
    kSecAttrAccessGroup, kSecAttrAccount, kSecAttrAuthenticationType, kSecAttrPath, kSecAttrPort,
    kSecAttrProtocol, kSecAttrSecurityDomain, kSecAttrServer, kSecAttrService, kSecClass,
    kSecClassGenericPassword, kSecClassInternetPassword, kSecMatchLimit, kSecMatchLimitAll,
    kSecMatchLimitOne, kSecReturnAttributes, kSecReturnData, kSecValueData,
};
use security_framework_sys::keychain_item::{
    SecItemAdd, SecItemCopyMatching, SecItemDelete, SecItemUpdate,
};
use tracing::trace;

use crate::backend::{delete_repeatedly, CredentialBackend, OsStatus, Record};
use crate::queryable::{Attribute, AttributeValue, ItemClass, Query};

/// Upper bound on repeated deletes; some keychains remove one match per call.
const MAX_DELETE_ROUNDS: usize = 1024;

/// The user's default keychain search list.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeychainBackend;

impl KeychainBackend {
    pub fn new() -> Self {
        Self
    }
}

fn key(raw: CFStringRef) -> CFString {
    // SAFETY: the `kSec*` constants are static CFStrings owned by Security.framework.
    unsafe { CFString::wrap_under_get_rule(raw) }
}

fn attribute_key(attribute: Attribute) -> CFString {
    key(match attribute {
        Attribute::Class => unsafe { kSecClass },
        Attribute::Service => unsafe { kSecAttrService },
        Attribute::Account => unsafe { kSecAttrAccount },
        Attribute::AccessGroup => unsafe { kSecAttrAccessGroup },
        Attribute::Server => unsafe { kSecAttrServer },
        Attribute::Port => unsafe { kSecAttrPort },
        Attribute::Path => unsafe { kSecAttrPath },
        Attribute::SecurityDomain => unsafe { kSecAttrSecurityDomain },
        Attribute::Protocol => unsafe { kSecAttrProtocol },
        Attribute::AuthenticationType => unsafe { kSecAttrAuthenticationType },
    })
}

fn attribute_value(value: &AttributeValue) -> CFType {
    match value {
        AttributeValue::Class(ItemClass::GenericPassword) => {
            key(unsafe { kSecClassGenericPassword }).into_CFType()
        }
        AttributeValue::Class(ItemClass::InternetPassword) => {
            key(unsafe { kSecClassInternetPassword }).into_CFType()
        }
        AttributeValue::Text(text) => CFString::new(text).into_CFType(),
        AttributeValue::Port(port) => CFNumber::from(i32::from(*port)).into_CFType(),
        AttributeValue::Protocol(protocol) => {
            CFString::new(protocol.four_char_code()).into_CFType()
        }
        AttributeValue::AuthenticationType(auth) => {
            CFString::new(auth.four_char_code()).into_CFType()
        }
    }
}

fn pairs(query: &Query) -> Vec<(CFString, CFType)> {
    query
        .iter()
        .map(|(attribute, value)| (attribute_key(*attribute), attribute_value(value)))
        .collect()
}

fn dictionary(pairs: &[(CFString, CFType)]) -> CFDictionary<CFString, CFType> {
    CFDictionary::from_CFType_pairs(pairs)
}

/// Run `SecItemCopyMatching`, handing back the owned result on success.
fn copy_matching_raw(pairs: &[(CFString, CFType)]) -> (OsStatus, Option<CFType>) {
    let query = dictionary(pairs);
    let mut result: CFTypeRef = std::ptr::null();
    // SAFETY: `query` is a valid dictionary for the duration of the call and
    // `result` is an out-pointer the call fills with a +1 reference.
    let status = OsStatus(unsafe { SecItemCopyMatching(query.as_concrete_TypeRef(), &mut result) });
    if !status.is_success() || result.is_null() {
        return (status, None);
    }
    // SAFETY: copy functions return an owned reference (create rule).
    (status, Some(unsafe { CFType::wrap_under_create_rule(result) }))
}

impl CredentialBackend for KeychainBackend {
    fn add(&self, attributes: &Query, data: &[u8]) -> OsStatus {
        let mut pairs = pairs(attributes);
        pairs.push((key(unsafe { kSecValueData }), CFData::from_buffer(data).into_CFType()));
        let attributes = dictionary(&pairs);

        // SAFETY: valid dictionary; a null result pointer asks for no return value.
        let status = OsStatus(unsafe {
            SecItemAdd(attributes.as_concrete_TypeRef(), std::ptr::null_mut())
        });
        trace!(status = status.code(), "SecItemAdd");
        status
    }

    fn count(&self, query: &Query) -> (OsStatus, usize) {
        let mut count_pairs = pairs(query);
        count_pairs.push((
            key(unsafe { kSecReturnAttributes }),
            CFBoolean::true_value().into_CFType(),
        ));
        count_pairs.push((
            key(unsafe { kSecMatchLimit }),
            key(unsafe { kSecMatchLimitAll }).into_CFType(),
        ));

        let (status, result) = copy_matching_raw(&count_pairs);
        trace!(status = status.code(), "SecItemCopyMatching (attributes)");
        match result.as_ref().and_then(|r| r.downcast::<CFArray>()) {
            Some(array) => (status, usize::try_from(array.len()).unwrap_or(0)),
            None if status.is_success() => (status, 1),
            None => (status, 0),
        }
    }

    fn copy_matching(&self, query: &Query) -> (OsStatus, Vec<Record>) {
        // Payloads cannot be requested together with an unlimited match on
        // macOS, so count first and load data only for a unique match.
        let (status, count) = self.count(query);
        if !status.is_success() {
            return (status, Vec::new());
        }
        if count != 1 {
            let records = (0..count)
                .map(|_| Record::new(query.clone(), Vec::new()))
                .collect();
            return (status, records);
        }

        let mut data_pairs = pairs(query);
        data_pairs.push((key(unsafe { kSecReturnData }), CFBoolean::true_value().into_CFType()));
        data_pairs.push((
            key(unsafe { kSecMatchLimit }),
            key(unsafe { kSecMatchLimitOne }).into_CFType(),
        ));

        let (status, result) = copy_matching_raw(&data_pairs);
        trace!(status = status.code(), "SecItemCopyMatching (data)");
        match result.and_then(|r| r.downcast_into::<CFData>()) {
            Some(data) => (status, vec![Record::new(query.clone(), data.bytes().to_vec())]),
            None if status.is_success() => (OsStatus::DECODE, Vec::new()),
            None => (status, Vec::new()),
        }
    }

    fn update(&self, query: &Query, data: &[u8]) -> OsStatus {
        let query = dictionary(&pairs(query));
        let changes = dictionary(&[(
            key(unsafe { kSecValueData }),
            CFData::from_buffer(data).into_CFType(),
        )]);

        // SAFETY: both dictionaries outlive the call.
        let status = OsStatus(unsafe {
            SecItemUpdate(query.as_concrete_TypeRef(), changes.as_concrete_TypeRef())
        });
        trace!(status = status.code(), "SecItemUpdate");
        status
    }

    fn delete(&self, query: &Query) -> OsStatus {
        let query = dictionary(&pairs(query));
        let status = delete_repeatedly(MAX_DELETE_ROUNDS, || {
            // SAFETY: `query` outlives every call.
            OsStatus(unsafe { SecItemDelete(query.as_concrete_TypeRef()) })
        });
        trace!(status = status.code(), "SecItemDelete");
        status
    }

    fn status_message(&self, status: OsStatus) -> String {
        security_framework::base::Error::from_code(status.code())
            .message()
            .unwrap_or_else(|| status.description().to_string())
    }
}
