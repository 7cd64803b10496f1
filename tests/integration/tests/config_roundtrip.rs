//! Config save/load roundtrip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back into the namespace a store is opened with.

use securestore::{ItemClass, Protocol, Queryable};
use securestore_core::config::{Config, ConfigBuilder, LogFormat, LogLevel, NamespaceConfig};
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("securestore.json5");

    let config = ConfigBuilder::new()
        .generic_password("someService")
        .log_level(LogLevel::Debug)
        .log_format(LogFormat::Json)
        .build();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.namespace, config.namespace);
    assert_eq!(loaded.logging.level, LogLevel::Debug);
    assert_eq!(loaded.logging.format, LogFormat::Json);
}

#[test]
fn test_default_config_has_no_namespace() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("securestore.json5");

    Config::default().save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert!(loaded.namespace.is_none());
    assert_eq!(loaded.logging.format, LogFormat::Pretty);
}

#[test]
fn test_hand_written_json5_becomes_queryable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("securestore.json5");
    std::fs::write(
        &path,
        r#"{
            // comments and trailing commas are fine
            namespace: {
                kind: "internet_password",
                server: "someServer",
                port: 8080,
                path: "somePath",
                security_domain: "someDomain",
                protocol: "https",
                authentication_type: "http_basic",
            },
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    config.validate().unwrap();

    let namespace = config.namespace.as_ref().unwrap();
    let queryable = Queryable::from_config(namespace).unwrap();
    assert_eq!(queryable.class(), ItemClass::InternetPassword);
    match queryable {
        Queryable::InternetPassword(internet) => {
            assert_eq!(internet.server(), "someServer");
            assert_eq!(internet.port(), 8080);
            assert_eq!(internet.protocol(), Protocol::Https);
        }
        other => panic!("Expected internet password, got {}", other),
    }
}

#[test]
fn test_out_of_range_port_fails_validation() {
    let config = ConfigBuilder::new()
        .namespace(NamespaceConfig::InternetPassword {
            server: "someServer".to_string(),
            port: 70000,
            path: String::new(),
            security_domain: String::new(),
            protocol: "https".to_string(),
            authentication_type: "default".to_string(),
            access_group: None,
        })
        .build();

    assert!(config.validate().is_err());
    let namespace = config.namespace.as_ref().unwrap();
    assert!(Queryable::from_config(namespace).is_err());
}
