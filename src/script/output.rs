use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use crate::bus::{Event, Topic};

/// One delivered event as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct DeliveredEvent<'a> {
    pub topic: &'a str,
    pub received_at: DateTime<Utc>,
    pub event: &'a Event,
}

/// Prints every event from `rx` as a JSON line until the channel closes.
pub async fn print_events(topic: Topic, mut rx: UnboundedReceiver<Event>) {
    while let Some(event) = rx.recv().await {
        let line = DeliveredEvent {
            topic: topic.as_str(),
            received_at: Utc::now(),
            event: &event,
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(%topic, error = %e, "failed to serialize event"),
        }
    }
}
