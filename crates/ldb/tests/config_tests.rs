use ldb::config::Config;
use serial_test::serial;
use std::time::Duration;
use tempfile::TempDir;
use tracing::info;

#[test]
fn test_save_and_load_round_trip() {
    ldb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ldb.toml");

    let mut config = Config::default();
    config.channel.port = 7000;
    config.protocol.delimiter = "#".to_string();
    config.session.highlight_ms = 500;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.wire_format().delimiter, "#");
    assert_eq!(loaded.session_config().highlight_window, Duration::from_millis(500));
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    ldb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.toml");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists());
}

#[test]
fn test_malformed_file_is_rejected() {
    ldb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[channel\nport = ").unwrap();

    let error = Config::load_from(&path).unwrap_err();
    assert!(format!("{error:#}").contains("TOML"));
}

#[test]
#[serial]
fn test_load_uses_home_directory() {
    ldb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let home = TempDir::new().unwrap();
    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());

    let path = Config::config_path().unwrap();
    assert_eq!(path, home.path().join(".ldb.toml"));

    let mut config = Config::load().unwrap();
    assert!(path.exists());
    config.channel.host = "0.0.0.0".to_string();
    config.save().unwrap();
    assert_eq!(Config::load().unwrap().channel.host, "0.0.0.0");

    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
}
