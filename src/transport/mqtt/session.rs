//! Broker session lifecycle
//!
//! [`MqttSession`] owns the rumqttc client and its polled event loop. Connect
//! blocks until the broker acknowledges the handshake; after that the event
//! loop runs in a background task, forwarding messages and connection
//! transitions as [`SessionEvent`]s. Reconnection is the library's job - the
//! task just keeps polling and re-issues the subscription on each CONNACK.

use super::connection::{configure_mqtt_options, ConnectionState, SessionError};
use super::events::{route_event, EventRoute, SessionEvent};
use crate::config::Config;
use rumqttc::{AsyncClient, Event, EventLoop, Outgoing, QoS};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Fixed subscription QoS; deliberately not configurable.
const SUBSCRIBE_QOS: QoS = QoS::AtMostOnce;

/// How long `connect` waits for the broker's CONNACK.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pacing delay before re-polling after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Budget for flushing the MQTT DISCONNECT packet on shutdown.
const DISCONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// A live subscriber session against one broker.
pub struct MqttSession {
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
    event_loop_handle: Option<JoinHandle<()>>,
}

impl MqttSession {
    /// Connect to the broker described by `config` and subscribe to its topic.
    ///
    /// Blocks until the transport-level handshake completes; an initial
    /// connect failure is returned as an error and callers should treat it as
    /// fatal. Incoming messages and connection transitions are delivered on
    /// `events` until the session is disconnected.
    pub async fn connect(
        config: &Config,
        events: mpsc::Sender<SessionEvent>,
    ) -> Result<Self, SessionError> {
        let mqtt_options = configure_mqtt_options(config)?;
        let (client, event_loop) = AsyncClient::new(mqtt_options, 10);

        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let topic = config.topic_name.clone();
        let handle = tokio::spawn(run_event_loop(
            event_loop,
            client,
            topic,
            state_tx,
            shutdown_rx,
            events,
        ));

        let session = Self {
            state_rx: state_rx.clone(),
            shutdown_tx,
            event_loop_handle: Some(handle),
        };

        Self::wait_for_connection(state_rx, CONNECT_TIMEOUT).await?;
        Ok(session)
    }

    /// Wait until the session reports a connected state, a terminal
    /// disconnect, or the timeout elapses.
    async fn wait_for_connection(
        mut state_rx: watch::Receiver<ConnectionState>,
        timeout: Duration,
    ) -> Result<(), SessionError> {
        let timeout_result = tokio::time::timeout(timeout, async {
            loop {
                {
                    let state = state_rx.borrow();
                    match &*state {
                        ConnectionState::Connected | ConnectionState::Subscribed => {
                            return Ok(());
                        }
                        ConnectionState::Disconnected(reason) => {
                            return Err(SessionError::ConnectionFailed(reason.clone()));
                        }
                        ConnectionState::Connecting => {}
                    }
                }
                if state_rx.changed().await.is_err() {
                    return Err(SessionError::ConnectionFailed(
                        "state channel closed".to_string(),
                    ));
                }
            }
        })
        .await;

        match timeout_result {
            Ok(result) => result,
            Err(_) => Err(SessionError::ConnectionFailed(
                "timed out waiting for broker acknowledgment".to_string(),
            )),
        }
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.state_rx.borrow().clone()
    }

    /// Disconnect from the broker and stop the event loop.
    ///
    /// The DISCONNECT packet is flushed with a bounded budget, then the event
    /// loop task is joined; a task that does not stop in time is aborted.
    pub async fn disconnect(&mut self) -> Result<(), SessionError> {
        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = self.event_loop_handle.take() {
            match tokio::time::timeout(Duration::from_secs(2), handle).await {
                Ok(Ok(())) => debug!("Event loop task shut down gracefully"),
                Ok(Err(e)) if !e.is_cancelled() => {
                    warn!("Event loop task ended with error: {e}");
                }
                Err(_) => warn!("Event loop task didn't shut down in time, aborting"),
                _ => {}
            }
        }

        info!("MQTT session disconnected");
        Ok(())
    }
}

impl Drop for MqttSession {
    fn drop(&mut self) {
        // Stop the background task if disconnect() was never called.
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.event_loop_handle.take() {
            handle.abort();
        }
    }
}

/// Poll the event loop until shutdown, forwarding session events.
async fn run_event_loop(
    mut event_loop: EventLoop,
    client: AsyncClient,
    topic: String,
    state_tx: watch::Sender<ConnectionState>,
    mut shutdown_rx: watch::Receiver<bool>,
    events: mpsc::Sender<SessionEvent>,
) {
    let mut connected_once = false;

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    flush_disconnect(&client, &mut event_loop).await;
                    break;
                }
            }
            polled = event_loop.poll() => match polled {
                Ok(event) => match route_event(&event) {
                    EventRoute::ConnectionAcknowledged => {
                        connected_once = true;
                        let _ = state_tx.send(ConnectionState::Connected);
                        info!("Connected to broker, subscribing to {topic}");
                        if let Err(e) = client.subscribe(&topic, SUBSCRIBE_QOS).await {
                            error!("Failed to request subscription to {topic}: {e}");
                        }
                        if events.send(SessionEvent::Connected).await.is_err() {
                            break;
                        }
                    }
                    EventRoute::SubscriptionConfirmed { success: true } => {
                        let _ = state_tx.send(ConnectionState::Subscribed);
                        debug!("Subscription to {topic} acknowledged");
                    }
                    EventRoute::SubscriptionConfirmed { success: false } => {
                        error!("Broker rejected subscription to {topic}");
                    }
                    EventRoute::MessageReceived { topic, payload } => {
                        debug!("Received message on topic: {topic}");
                        if events
                            .send(SessionEvent::Message { topic, payload })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    EventRoute::Disconnected => {
                        let reason = "disconnected by broker".to_string();
                        let _ = state_tx.send(ConnectionState::Disconnected(reason.clone()));
                        warn!("Broker requested disconnect");
                        if events
                            .send(SessionEvent::ConnectionLost { reason })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    EventRoute::Infrastructure | EventRoute::Outgoing => {}
                },
                Err(e) => {
                    let reason = e.to_string();
                    let _ = state_tx.send(ConnectionState::Disconnected(reason.clone()));

                    if !connected_once {
                        error!("MQTT connect failed: {reason}");
                        break;
                    }

                    warn!("MQTT connection lost: {reason}");
                    if events
                        .send(SessionEvent::ConnectionLost { reason })
                        .await
                        .is_err()
                    {
                        break;
                    }
                    // The event loop reconnects on the next poll; pace the retries.
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }

    debug!("MQTT event loop stopped");
}

/// Send DISCONNECT and poll until it is flushed or the budget runs out.
async fn flush_disconnect(client: &AsyncClient, event_loop: &mut EventLoop) {
    if client.try_disconnect().is_err() {
        return;
    }

    let deadline = tokio::time::sleep(DISCONNECT_TIMEOUT);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                warn!("Timed out flushing MQTT disconnect");
                break;
            }
            polled = event_loop.poll() => match polled {
                Ok(Event::Outgoing(Outgoing::Disconnect)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }
}
