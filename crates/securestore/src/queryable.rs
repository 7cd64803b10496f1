//! Credential namespaces and the attribute queries that scope them.
//!
//! A [`Queryable`] is either a generic password (scoped by service name) or
//! an internet password (scoped by server, port, path, security domain,
//! protocol, and authentication scheme). [`Queryable::query`] turns it into
//! the [`Query`] a backend uses both to look records up and to create them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use securestore_core::config::NamespaceConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Record class stored in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    GenericPassword,
    InternetPassword,
}

impl fmt::Display for ItemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericPassword => f.write_str("generic_password"),
            Self::InternetPassword => f.write_str("internet_password"),
        }
    }
}

/// Attribute names understood by credential backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Class,
    Service,
    /// Holds the item key within a namespace.
    Account,
    AccessGroup,
    Server,
    Port,
    Path,
    SecurityDomain,
    Protocol,
    AuthenticationType,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Service => "service",
            Self::Account => "account",
            Self::AccessGroup => "access_group",
            Self::Server => "server",
            Self::Port => "port",
            Self::Path => "path",
            Self::SecurityDomain => "security_domain",
            Self::Protocol => "protocol",
            Self::AuthenticationType => "authentication_type",
        }
    }
}

/// Value of a single query attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeValue {
    Class(ItemClass),
    Text(String),
    Port(u16),
    Protocol(Protocol),
    AuthenticationType(AuthenticationType),
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A mapping from attribute name to value.
///
/// Used to scope lookups and, for writes, as the attribute set of the new
/// record. A query matches a record when every attribute it names is present
/// on the record with an equal value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    attributes: BTreeMap<Attribute, AttributeValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query naming only the record class.
    pub fn for_class(class: ItemClass) -> Self {
        Self::new().with(Attribute::Class, AttributeValue::Class(class))
    }

    /// Builder-style insert.
    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.insert(attribute, value);
        self
    }

    /// Insert or replace an attribute, returning the previous value.
    pub fn insert(
        &mut self,
        attribute: Attribute,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(attribute, value.into())
    }

    pub fn get(&self, attribute: Attribute) -> Option<&AttributeValue> {
        self.attributes.get(&attribute)
    }

    /// Text value of `attribute`, if present and textual.
    pub fn text(&self, attribute: Attribute) -> Option<&str> {
        match self.attributes.get(&attribute) {
            Some(AttributeValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Record class named by this query.
    pub fn class(&self) -> Option<ItemClass> {
        match self.attributes.get(&Attribute::Class) {
            Some(AttributeValue::Class(class)) => Some(*class),
            _ => None,
        }
    }

    /// Whether every attribute of `self` appears in `other` with the same value.
    pub fn is_subset_of(&self, other: &Query) -> bool {
        self.attributes
            .iter()
            .all(|(attr, value)| other.attributes.get(attr) == Some(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &AttributeValue)> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Normalize a user-facing enum name: case-insensitive, `-` and `_` interchangeable.
fn normalize_name(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

macro_rules! four_char_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($variant:ident => $label:literal, $code:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every supported value.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Configuration name, e.g. as written in the config file.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Four-character code stored in the platform credential store.
            pub fn four_char_code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = normalize_name(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name() == wanted)
                    .ok_or_else(|| {
                        StoreError::InvalidConfiguration(format!(
                            concat!("unrecognized ", $what, " '{}'"),
                            s
                        ))
                    })
            }
        }
    };
}

four_char_enum! {
    /// Network protocol of an internet password.
    Protocol, "protocol" {
        Ftp => "ftp", "ftp ";
        FtpAccount => "ftp_account", "ftpa";
        Http => "http", "http";
        Irc => "irc", "irc ";
        Nntp => "nntp", "nntp";
        Pop3 => "pop3", "pop3";
        Smtp => "smtp", "smtp";
        Socks => "socks", "sox ";
        Imap => "imap", "imap";
        Ldap => "ldap", "ldap";
        Appletalk => "appletalk", "atlk";
        Afp => "afp", "afp ";
        Telnet => "telnet", "teln";
        Ssh => "ssh", "ssh ";
        Ftps => "ftps", "ftps";
        Https => "https", "htps";
        HttpProxy => "http_proxy", "htpx";
        HttpsProxy => "https_proxy", "htsx";
        FtpProxy => "ftp_proxy", "ftpx";
        Smb => "smb", "smb ";
        Rtsp => "rtsp", "rtsp";
        RtspProxy => "rtsp_proxy", "rtsx";
        Daap => "daap", "daap";
        Eppc => "eppc", "eppc";
        Ipp => "ipp", "ipp ";
        Nntps => "nntps", "ntps";
        Ldaps => "ldaps", "ldps";
        Telnets => "telnets", "tels";
        Imaps => "imaps", "imps";
        Ircs => "ircs", "ircs";
        Pop3s => "pop3s", "pops";
    }
}

four_char_enum! {
    /// Authentication scheme of an internet password.
    AuthenticationType, "authentication type" {
        Ntlm => "ntlm", "ntlm";
        Msn => "msn", "msna";
        Dpa => "dpa", "dpaa";
        Rpa => "rpa", "rpaa";
        HttpBasic => "http_basic", "http";
        HttpDigest => "http_digest", "httd";
        HtmlForm => "html_form", "form";
        Default => "default", "dflt";
    }
}

/// Generic-password namespace, scoped by service name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPassword {
    service: String,
    access_group: Option<String>,
}

impl GenericPassword {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            access_group: None,
        }
    }

    /// Share the namespace with other applications in `group`.
    pub fn with_access_group(mut self, group: impl Into<String>) -> Self {
        self.access_group = Some(group.into());
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn access_group(&self) -> Option<&str> {
        self.access_group.as_deref()
    }
}

/// Internet-password namespace, scoped by endpoint details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetPassword {
    server: String,
    port: u16,
    path: String,
    security_domain: String,
    protocol: Protocol,
    authentication_type: AuthenticationType,
    access_group: Option<String>,
}

impl InternetPassword {
    pub fn new(
        server: impl Into<String>,
        port: u16,
        path: impl Into<String>,
        security_domain: impl Into<String>,
        protocol: Protocol,
        authentication_type: AuthenticationType,
    ) -> Self {
        Self {
            server: server.into(),
            port,
            path: path.into(),
            security_domain: security_domain.into(),
            protocol,
            authentication_type,
            access_group: None,
        }
    }

    /// Build from untyped parts, validating the port range and the protocol
    /// and authentication type names.
    pub fn parse(
        server: &str,
        port: i64,
        path: &str,
        security_domain: &str,
        protocol: &str,
        authentication_type: &str,
    ) -> Result<Self> {
        if server.trim().is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "server must not be empty".to_string(),
            ));
        }
        let port = u16::try_from(port).map_err(|_| {
            StoreError::InvalidConfiguration(format!("port must be 0-65535, got {port}"))
        })?;

        Ok(Self::new(
            server,
            port,
            path,
            security_domain,
            protocol.parse()?,
            authentication_type.parse()?,
        ))
    }

    /// Share the namespace with other applications in `group`.
    pub fn with_access_group(mut self, group: impl Into<String>) -> Self {
        self.access_group = Some(group.into());
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn security_domain(&self) -> &str {
        &self.security_domain
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn authentication_type(&self) -> AuthenticationType {
        self.authentication_type
    }

    pub fn access_group(&self) -> Option<&str> {
        self.access_group.as_deref()
    }
}

/// A credential namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Queryable {
    GenericPassword(GenericPassword),
    InternetPassword(InternetPassword),
}

impl Queryable {
    /// Attribute set scoping this namespace.
    pub fn query(&self) -> Query {
        let (mut query, access_group) = match self {
            Self::GenericPassword(generic) => (
                Query::for_class(ItemClass::GenericPassword)
                    .with(Attribute::Service, generic.service.as_str()),
                generic.access_group.as_deref(),
            ),
            Self::InternetPassword(internet) => (
                Query::for_class(ItemClass::InternetPassword)
                    .with(Attribute::Server, internet.server.as_str())
                    .with(Attribute::Port, AttributeValue::Port(internet.port))
                    .with(Attribute::Path, internet.path.as_str())
                    .with(Attribute::SecurityDomain, internet.security_domain.as_str())
                    .with(Attribute::Protocol, AttributeValue::Protocol(internet.protocol))
                    .with(
                        Attribute::AuthenticationType,
                        AttributeValue::AuthenticationType(internet.authentication_type),
                    ),
                internet.access_group.as_deref(),
            ),
        };

        if let Some(group) = access_group {
            query.insert(Attribute::AccessGroup, group);
        }
        query
    }

    pub fn class(&self) -> ItemClass {
        match self {
            Self::GenericPassword(_) => ItemClass::GenericPassword,
            Self::InternetPassword(_) => ItemClass::InternetPassword,
        }
    }

    /// Build a validated queryable from a config namespace section.
    pub fn from_config(config: &NamespaceConfig) -> Result<Self> {
        match config {
            NamespaceConfig::GenericPassword {
                service,
                access_group,
            } => {
                if service.trim().is_empty() {
                    return Err(StoreError::InvalidConfiguration(
                        "service must not be empty".to_string(),
                    ));
                }
                let mut generic = GenericPassword::new(service.as_str());
                if let Some(group) = access_group {
                    generic = generic.with_access_group(group.as_str());
                }
                Ok(generic.into())
            }
            NamespaceConfig::InternetPassword {
                server,
                port,
                path,
                security_domain,
                protocol,
                authentication_type,
                access_group,
            } => {
                let mut internet = InternetPassword::parse(
                    server,
                    *port,
                    path,
                    security_domain,
                    protocol,
                    authentication_type,
                )?;
                if let Some(group) = access_group {
                    internet = internet.with_access_group(group.as_str());
                }
                Ok(internet.into())
            }
        }
    }
}

impl From<GenericPassword> for Queryable {
    fn from(generic: GenericPassword) -> Self {
        Self::GenericPassword(generic)
    }
}

impl From<InternetPassword> for Queryable {
    fn from(internet: InternetPassword) -> Self {
        Self::InternetPassword(internet)
    }
}

impl fmt::Display for Queryable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GenericPassword(g) => write!(f, "generic password '{}'", g.service),
            Self::InternetPassword(i) => write!(
                f,
                "internet password {}://{}:{}/{}",
                i.protocol,
                i.server,
                i.port,
                i.path.trim_start_matches('/')
            ),
        }
    }
}
