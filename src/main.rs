//! mqttail - Main Entry Point

use clap::Parser;
use mqttail::config::Config;
use mqttail::observability::init_default_logging;
use mqttail::transport::mqtt::MqttSession;
use mqttail::{output, shutdown, SubscriberError};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Minimal configurable MQTT topic subscriber
#[derive(Parser)]
#[command(name = "mqttail")]
#[command(about = "Subscribe to an MQTT topic and print incoming messages")]
#[command(version)]
struct Cli {
    /// Configuration file path (created with defaults on first run)
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    info!("Starting mqttail v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load_or_init(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            let e = SubscriberError::from(e);
            error!("Failed to load configuration: {e}");
            process::exit(e.exit_code());
        }
    };
    info!(
        broker_url = %config.broker_url,
        client_id = %config.client_id,
        topic = %config.topic_name,
        "Configuration loaded"
    );

    // Single writer task: the session's event-loop task hands events over
    // this channel so stdout has exactly one writer.
    let (event_tx, event_rx) = mpsc::channel(64);
    let writer = tokio::spawn(output::write_events(event_rx, std::io::stdout()));

    let mut session = match MqttSession::connect(&config, event_tx).await {
        Ok(session) => session,
        Err(e) => {
            let e = SubscriberError::from(e);
            error!("Failed to connect to MQTT broker: {e}");
            process::exit(e.exit_code());
        }
    };

    info!("Subscriber is running, waiting for messages...");

    match shutdown::wait_for_shutdown().await {
        Ok(signal) => info!("Received {signal}, shutting down"),
        Err(e) => {
            error!("Failed to listen for shutdown signals: {e}");
            process::exit(1);
        }
    }
    println!("Interrupted, shutting down");

    if let Err(e) = session.disconnect().await {
        warn!("Error during disconnect: {e}");
    }

    // The writer stops once the session's sender is dropped; bound the drain.
    if tokio::time::timeout(Duration::from_secs(1), writer)
        .await
        .is_err()
    {
        warn!("Timed out draining output writer");
    }

    info!("Shutdown complete");
}
