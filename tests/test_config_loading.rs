//! Configuration loading tests
//!
//! Tests focus on BEHAVIOR of configuration loading: first-run default
//! persistence, round-trips through the file, and error handling. We test
//! observable outcomes, not implementation details of JSON parsing.

use mqttail::config::{Config, ConfigError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_first_run_writes_defaults_and_returns_them() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = Config::load_or_init(&path).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.broker_url, "tcp://localhost:1883");
    assert_eq!(config.username, "");
    assert_eq!(config.password, "");
    assert_eq!(config.client_id, "myClientID");
    assert_eq!(config.keep_alive, 60);
    assert_eq!(config.topic_name, "myTopic");

    // The file must contain exactly the default field values.
    let written = fs::read_to_string(&path).unwrap();
    let reparsed: Config = serde_json::from_str(&written).unwrap();
    assert_eq!(reparsed, Config::default());
}

#[test]
fn test_first_run_file_is_indented_with_four_spaces() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    Config::load_or_init(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("    \"brokerURL\""));
}

#[test]
fn test_existing_file_values_are_returned_verbatim() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
    "brokerURL": "mqtts://broker.example.com:8884",
    "username": "alice",
    "password": "hunter2",
    "clientID": "probe-1",
    "keepAlive": 15,
    "topicName": "plant/+/temperature"
}"#,
    )
    .unwrap();

    let config = Config::load_or_init(&path).unwrap();

    assert_eq!(config.broker_url, "mqtts://broker.example.com:8884");
    assert_eq!(config.username, "alice");
    assert_eq!(config.password, "hunter2");
    assert_eq!(config.client_id, "probe-1");
    assert_eq!(config.keep_alive, 15);
    assert_eq!(config.topic_name, "plant/+/temperature");
}

#[test]
fn test_partial_file_keeps_defaults_for_absent_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"brokerURL": "tcp://10.0.0.2:1883"}"#).unwrap();

    let config = Config::load_or_init(&path).unwrap();

    assert_eq!(config.broker_url, "tcp://10.0.0.2:1883");
    assert_eq!(config.client_id, "myClientID");
    assert_eq!(config.keep_alive, 60);
    assert_eq!(config.topic_name, "myTopic");
}

#[test]
fn test_malformed_file_is_an_error_not_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "not json at all {{{").unwrap();

    let result = Config::load_or_init(&path);

    assert!(matches!(result, Err(ConfigError::Malformed(_))));
}

#[test]
fn test_wrong_field_type_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"keepAlive": "sixty"}"#).unwrap();

    let result = Config::load_or_init(&path);

    assert!(matches!(result, Err(ConfigError::Malformed(_))));
}

#[test]
fn test_unwritable_default_path_fails_the_load() {
    let dir = tempdir().unwrap();
    // Parent directory does not exist, so the first-run write must fail.
    let path = dir.path().join("missing").join("config.json");

    let result = Config::load_or_init(&path);

    assert!(matches!(result, Err(ConfigError::FileWrite(_))));
}
