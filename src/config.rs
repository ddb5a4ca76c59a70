//! Configuration loading for the subscriber
//!
//! The configuration lives in a single JSON file. On first run the compiled-in
//! defaults are written to that file; afterwards the file is authoritative.
//! Fields absent from the file keep their defaults, but a file that fails to
//! decode is an error rather than a silent fallback.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Subscriber configuration, constructed once at startup and immutable after.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Broker address as a URL, e.g. `tcp://localhost:1883`
    #[serde(rename = "brokerURL", default = "default_broker_url")]
    pub broker_url: String,
    /// Username for broker authentication (empty = no credentials)
    #[serde(default)]
    pub username: String,
    /// Password for broker authentication (empty = no credentials)
    #[serde(default)]
    pub password: String,
    /// Client identifier presented to the broker
    #[serde(rename = "clientID", default = "default_client_id")]
    pub client_id: String,
    /// Keep-alive interval in seconds
    #[serde(rename = "keepAlive", default = "default_keep_alive")]
    pub keep_alive: u64,
    /// Topic to subscribe to (may contain broker wildcard segments)
    #[serde(rename = "topicName", default = "default_topic_name")]
    pub topic_name: String,
}

fn default_broker_url() -> String {
    "tcp://localhost:1883".to_string()
}

fn default_client_id() -> String {
    "myClientID".to_string()
}

fn default_keep_alive() -> u64 {
    60
}

fn default_topic_name() -> String {
    "myTopic".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            broker_url: default_broker_url(),
            username: String::new(),
            password: String::new(),
            client_id: default_client_id(),
            keep_alive: default_keep_alive(),
            topic_name: default_topic_name(),
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[source] std::io::Error),
    #[error("failed to write default config file: {0}")]
    FileWrite(#[source] std::io::Error),
    #[error("malformed configuration: {0}")]
    Malformed(#[source] serde_json::Error),
}

impl Config {
    /// Load configuration from `path`, creating the file with defaults if it
    /// does not exist yet.
    ///
    /// A failed default-file write fails the load: defaults that could not be
    /// persisted are not assumed. A file that exists but does not decode is a
    /// [`ConfigError::Malformed`] error, never a default configuration.
    pub fn load_or_init(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.write_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        let config = serde_json::from_str(&content).map_err(ConfigError::Malformed)?;
        Ok(config)
    }

    /// Serialize to 4-space-indented JSON and write to `path`.
    fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(ConfigError::Malformed)?;
        std::fs::write(path, buf).map_err(ConfigError::FileWrite)
    }
}
