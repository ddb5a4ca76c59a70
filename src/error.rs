//! Top-level error type and process exit-code convention
//!
//! Module-level errors ([`ConfigError`], [`SessionError`]) are aggregated here
//! so the binary maps each failure class to one exit code.

use crate::config::ConfigError;
use crate::transport::mqtt::SessionError;
use thiserror::Error;

/// Main error type for subscriber startup and shutdown.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("broker session error: {0}")]
    Session(#[from] SessionError),
}

impl SubscriberError {
    /// Exit-code convention: 1 for configuration failures, 2 for broker
    /// session failures. Normal interrupt-triggered shutdown exits 0.
    pub fn exit_code(&self) -> i32 {
        match self {
            SubscriberError::Config(_) => 1,
            SubscriberError::Session(_) => 2,
        }
    }
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_per_failure_class() {
        let config_err = SubscriberError::Config(ConfigError::Malformed(
            serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
        ));
        assert_eq!(config_err.exit_code(), 1);

        let session_err = SubscriberError::Session(SessionError::ConnectionFailed(
            "connection refused".to_string(),
        ));
        assert_eq!(session_err.exit_code(), 2);
    }

    #[test]
    fn test_error_display_includes_source() {
        let err = SubscriberError::Session(SessionError::InvalidBrokerUrl("not-a-url".to_string()));
        assert!(err.to_string().contains("not-a-url"));
    }
}
