//! Rendering session events to the output sink
//!
//! All operator-facing lines go through [`write_events`], a single
//! consumer task, so concurrent event-loop activity can never interleave
//! partial lines on stdout. Rendering itself is pure and tested separately
//! from I/O.

use crate::transport::mqtt::SessionEvent;
use std::io::Write;
use tokio::sync::mpsc;
use tracing::warn;

/// Render one received message as its output line.
pub fn render_message(topic: &str, payload: &[u8]) -> String {
    format!(
        "Message arrived: {} from topic: {}",
        String::from_utf8_lossy(payload),
        topic
    )
}

/// Render a session event as its output line.
pub fn render_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Connected => "Connected to MQTT Broker!".to_string(),
        SessionEvent::ConnectionLost { .. } => "Connection lost!".to_string(),
        SessionEvent::Message { topic, payload } => render_message(topic, payload),
    }
}

/// Consume session events and write one line per event to `out`.
///
/// Runs until the sending side closes the channel or the sink fails.
pub async fn write_events<W: Write>(mut events: mpsc::Receiver<SessionEvent>, mut out: W) {
    while let Some(event) = events.recv().await {
        let line = render_event(&event);
        if writeln!(out, "{line}").and_then(|_| out.flush()).is_err() {
            warn!("Output sink failed, stopping event writer");
            break;
        }
    }
}
