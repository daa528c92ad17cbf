//! YAML configuration store and the config service.
//!
//! These tests mutate `SHIPSTACK_CONFIG` and are serialised with
//! `serial_test`.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use serial_test::serial;
use shipstack_cli::application::ports::ConfigStore;
use shipstack_cli::application::services::config_service;
use shipstack_cli::domain::config::ShipstackConfig;
use shipstack_cli::infra::config::{CONFIG_ENV, YamlConfigStore};
use tempfile::TempDir;

fn point_at_temp() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    // SAFETY: every test touching this variable is #[serial].
    unsafe { std::env::set_var(CONFIG_ENV, dir.path().join("config.yaml")) };
    dir
}

#[test]
#[serial]
fn missing_file_loads_defaults() {
    let _dir = point_at_temp();
    assert_eq!(YamlConfigStore.load().unwrap(), ShipstackConfig::default());
}

#[test]
#[serial]
fn set_value_persists() {
    let _dir = point_at_temp();
    config_service::set_value(&YamlConfigStore, "readiness.attempts", "12").unwrap();
    config_service::set_value(&YamlConfigStore, "database.org_id", "org-pinned").unwrap();

    let loaded = config_service::load_config(&YamlConfigStore).unwrap();
    assert_eq!(loaded.readiness.attempts, 12);
    assert_eq!(loaded.database.org_id.as_deref(), Some("org-pinned"));
    assert_eq!(loaded.local_dev.port, 3000);
}

#[test]
#[serial]
fn invalid_value_is_not_saved() {
    let dir = point_at_temp();
    let err = config_service::set_value(&YamlConfigStore, "local_dev.port", "http").unwrap_err();
    assert!(err.to_string().contains("local_dev.port"));
    assert!(!dir.path().join("config.yaml").exists());
}

#[test]
#[serial]
fn partial_file_fills_defaults() {
    let dir = point_at_temp();
    std::fs::write(dir.path().join("config.yaml"), "local_dev:\n  enabled: false\n").unwrap();
    let loaded = YamlConfigStore.load().unwrap();
    assert!(!loaded.local_dev.enabled);
    assert_eq!(loaded.local_dev.database_port, 5432);
    assert_eq!(loaded.readiness.delay_secs, 5);
}

#[cfg(unix)]
#[test]
#[serial]
fn saved_file_is_private() {
    use std::os::unix::fs::PermissionsExt;
    let dir = point_at_temp();
    YamlConfigStore.save(&ShipstackConfig::default()).unwrap();
    let mode = std::fs::metadata(dir.path().join("config.yaml"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
