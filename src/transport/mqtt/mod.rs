//! MQTT session adapter
//!
//! The module separates pure functions from I/O:
//!
//! - [`connection`] - connection state and option construction from config
//! - [`events`] - pure routing of client-library events
//! - [`session`] - the polled event loop and session lifecycle
//!
//! # Usage
//!
//! ```rust,no_run
//! use mqttail::config::Config;
//! use mqttail::transport::mqtt::MqttSession;
//! use tokio::sync::mpsc;
//!
//! # tokio_test::block_on(async {
//! let config = Config::default();
//! let (events, mut rx) = mpsc::channel(64);
//!
//! let mut session = MqttSession::connect(&config, events).await?;
//! while let Some(event) = rx.recv().await {
//!     println!("{event:?}");
//! }
//! session.disconnect().await?;
//! # Ok::<(), mqttail::transport::mqtt::SessionError>(())
//! # });
//! ```

pub mod connection;
pub mod events;
pub mod session;

pub use connection::{configure_mqtt_options, ConnectionState, SessionError};
pub use events::{route_event, EventRoute, SessionEvent};
pub use session::MqttSession;
