//! Connection state and option construction for the MQTT session
//!
//! Pure configuration handling: everything here is computed from the
//! [`Config`] record without touching the network.

use crate::config::Config;
use rumqttc::{MqttOptions, Transport};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Observable connection state of the broker session
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    /// Initial state - attempting to connect
    Connecting,
    /// CONNACK received, subscription requested
    Connected,
    /// SUBACK received for the configured topic
    Subscribed,
    /// Disconnected with reason
    Disconnected(String),
}

/// Broker session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid broker URL: {0}")]
    InvalidBrokerUrl(String),
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("subscription failed: {0}")]
    SubscriptionFailed(String),
}

/// Build MQTT options from the configuration.
///
/// Credentials are set only when both username and password are non-empty; a
/// present username with an empty password is treated as no credentials.
pub fn configure_mqtt_options(config: &Config) -> Result<MqttOptions, SessionError> {
    let url = Url::parse(&config.broker_url)
        .map_err(|_| SessionError::InvalidBrokerUrl(config.broker_url.clone()))?;

    let host = url
        .host_str()
        .ok_or_else(|| SessionError::InvalidBrokerUrl(config.broker_url.clone()))?;
    let tls = matches!(url.scheme(), "mqtts" | "ssl");
    let port = url.port().unwrap_or(if tls { 8883 } else { 1883 });

    let mut mqtt_options = MqttOptions::new(&config.client_id, host, port);

    if tls {
        mqtt_options.set_transport(Transport::tls_with_default_config());
    }

    if !config.username.is_empty() && !config.password.is_empty() {
        mqtt_options.set_credentials(&config.username, &config.password);
    }

    mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive));
    mqtt_options.set_clean_session(true);

    Ok(mqtt_options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_mqtt_options_defaults() {
        let options = configure_mqtt_options(&Config::default()).unwrap();
        assert_eq!(
            options.broker_address(),
            ("localhost".to_string(), 1883)
        );
        assert_eq!(options.client_id(), "myClientID");
        assert_eq!(options.keep_alive(), Duration::from_secs(60));
        assert!(options.credentials().is_none());
    }

    #[test]
    fn test_credentials_require_both_fields() {
        let mut config = Config {
            username: "alice".to_string(),
            ..Config::default()
        };
        let options = configure_mqtt_options(&config).unwrap();
        assert!(options.credentials().is_none(), "username alone is not a credential pair");

        config.username = String::new();
        config.password = "hunter2".to_string();
        let options = configure_mqtt_options(&config).unwrap();
        assert!(options.credentials().is_none(), "password alone is not a credential pair");

        config.username = "alice".to_string();
        let options = configure_mqtt_options(&config).unwrap();
        assert!(options.credentials().is_some());
    }

    #[test]
    fn test_explicit_port_wins() {
        let config = Config {
            broker_url: "tcp://broker.example.com:8883".to_string(),
            ..Config::default()
        };
        let options = configure_mqtt_options(&config).unwrap();
        assert_eq!(
            options.broker_address(),
            ("broker.example.com".to_string(), 8883)
        );
    }

    #[test]
    fn test_tls_scheme_default_port() {
        let config = Config {
            broker_url: "mqtts://broker.example.com".to_string(),
            ..Config::default()
        };
        let options = configure_mqtt_options(&config).unwrap();
        assert_eq!(options.broker_address().1, 8883);
    }

    #[test]
    fn test_invalid_broker_url() {
        let config = Config {
            broker_url: "not a url".to_string(),
            ..Config::default()
        };
        let result = configure_mqtt_options(&config);
        assert!(matches!(result, Err(SessionError::InvalidBrokerUrl(_))));
    }

    #[test]
    fn test_session_error_display() {
        let errors = vec![
            SessionError::InvalidBrokerUrl("test".to_string()),
            SessionError::ConnectionFailed("test".to_string()),
            SessionError::SubscriptionFailed("test".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
