//! mqttail - minimal MQTT topic subscriber
//!
//! Connects to a broker, subscribes to one topic, and prints each incoming
//! message to stdout until interrupted. The MQTT protocol itself (handshake,
//! keep-alive, QoS, reconnection, TLS) is delegated to the client library;
//! this crate provides the configuration, session wiring, output rendering,
//! and process lifecycle around it.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mqttail::config::Config;
//! use mqttail::output;
//! use mqttail::transport::mqtt::MqttSession;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let config = Config::load_or_init("config.json".as_ref())?;
//!
//! let (event_tx, event_rx) = mpsc::channel(64);
//! tokio::spawn(output::write_events(event_rx, std::io::stdout()));
//!
//! let mut session = MqttSession::connect(&config, event_tx).await?;
//! mqttail::shutdown::wait_for_shutdown().await.ok();
//! session.disconnect().await?;
//! # Ok::<(), mqttail::SubscriberError>(())
//! # });
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod output;
pub mod shutdown;
pub mod transport;

pub use config::{Config, ConfigError};
pub use error::{SubscriberError, SubscriberResult};
pub use transport::mqtt::{MqttSession, SessionError, SessionEvent};
