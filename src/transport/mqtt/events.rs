//! Pure routing of MQTT events
//!
//! [`route_event`] turns raw client-library events into routing decisions;
//! [`SessionEvent`] is what the session forwards to its consumer channel.

use bytes::Bytes;
use rumqttc::{Event, Packet, SubscribeReasonCode};

/// Routing decisions for MQTT events
#[derive(Debug, Clone)]
pub enum EventRoute {
    /// CONNACK received - ready to subscribe
    ConnectionAcknowledged,
    /// Message received on a subscribed topic
    MessageReceived { topic: String, payload: Bytes },
    /// SUBACK received for an outstanding subscribe request
    SubscriptionConfirmed { success: bool },
    /// Broker-initiated disconnect
    Disconnected,
    /// Infrastructure event (PingResp, acks, etc.)
    Infrastructure,
    /// Outgoing event (handled by the library)
    Outgoing,
}

/// Route an MQTT event to the appropriate handler (pure function).
pub fn route_event(event: &Event) -> EventRoute {
    match event {
        Event::Incoming(packet) => match packet {
            Packet::ConnAck(_) => EventRoute::ConnectionAcknowledged,
            Packet::Publish(publish) => EventRoute::MessageReceived {
                topic: publish.topic.clone(),
                payload: publish.payload.clone(),
            },
            Packet::SubAck(suback) => EventRoute::SubscriptionConfirmed {
                success: suback
                    .return_codes
                    .iter()
                    .all(|code| !matches!(code, SubscribeReasonCode::Failure)),
            },
            Packet::Disconnect => EventRoute::Disconnected,
            _ => EventRoute::Infrastructure,
        },
        Event::Outgoing(_) => EventRoute::Outgoing,
    }
}

/// Observable session transitions delivered to the consumer channel.
///
/// Delivery order matches the order the underlying event loop produced them;
/// no stronger ordering is promised than the transport itself provides.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Connect handshake completed
    Connected,
    /// Connection dropped; the library keeps trying to re-establish it
    ConnectionLost { reason: String },
    /// Message received on the subscribed topic
    Message { topic: String, payload: Bytes },
}
