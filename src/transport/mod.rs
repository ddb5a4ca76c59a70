//! Transport layer for broker communication
//!
//! The session lifecycle (connect, subscribe, deliver, disconnect) is owned
//! here; the MQTT protocol itself is delegated to the client library.

pub mod mqtt;
