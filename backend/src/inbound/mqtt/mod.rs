//! MQTT inbound adapter: topic layout and the subscriber loop.
//!
//! The device speaks a small stateless contract over five topics under one
//! prefix. This module owns the topic layout and the long-running loop
//! that turns broker traffic into classified [`DeviceEvent`]s for the feed
//! service.

pub mod classifier;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::{DeviceEvent, FeedService};

use self::classifier::classify;

/// Delay before re-polling the event loop after a transport error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Topic names derived from the device prefix (default `fishfeeder/01`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSet {
    /// Device→server status reports (feed events).
    pub status: String,
    /// Device→server connectivity announcements.
    pub connection: String,
    /// Device→server dispense progress.
    pub progress: String,
    /// Server→device manual feed command.
    pub cmd_feed: String,
    /// Server→device full schedule list.
    pub cmd_schedules: String,
}

impl TopicSet {
    /// Derive the topic layout from a device prefix.
    pub fn for_prefix(prefix: &str) -> Self {
        Self {
            status: format!("{prefix}/status"),
            connection: format!("{prefix}/status/connection"),
            progress: format!("{prefix}/status/progress"),
            cmd_feed: format!("{prefix}/cmd/feed"),
            cmd_schedules: format!("{prefix}/cmd/schedules"),
        }
    }

    /// The device→server topics the subscriber loop listens on.
    pub fn inbound(&self) -> [&str; 3] {
        [&self.status, &self.connection, &self.progress]
    }
}

impl Default for TopicSet {
    fn default() -> Self {
        Self::for_prefix("fishfeeder/01")
    }
}

/// Drive the broker event loop forever.
///
/// Subscribes on every (re)connect, classifies inbound publishes, and
/// mirrors the broker link state into the status board. Transport errors
/// are logged and retried after a fixed delay; rumqttc reconnects on the
/// next poll.
pub async fn run(
    client: AsyncClient,
    mut eventloop: EventLoop,
    topics: TopicSet,
    feeds: Arc<FeedService>,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("mqtt broker connected");
                feeds.board().set_broker_connected(true);
                for topic in topics.inbound() {
                    if let Err(subscribe_err) =
                        client.subscribe(topic, QoS::AtMostOnce).await
                    {
                        warn!(topic, error = %subscribe_err, "mqtt subscribe failed");
                    }
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                handle_publish(&topics, &feeds, &publish.topic, &publish.payload).await;
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                warn!("mqtt broker disconnected");
                feeds.board().set_broker_connected(false);
            }
            Ok(_) => {}
            Err(poll_err) => {
                feeds.board().set_broker_connected(false);
                log_connection_error(&poll_err);
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

async fn handle_publish(topics: &TopicSet, feeds: &FeedService, topic: &str, payload: &[u8]) {
    let Some(event) = classify(topics, topic, payload) else {
        return;
    };
    if let DeviceEvent::StatusReport { event, source } = &event {
        info!(event, source, "device status report");
    }
    feeds.ingest(event).await;
}

fn log_connection_error(error: &ConnectionError) {
    warn!(error = %error, "mqtt event loop error, retrying");
}
