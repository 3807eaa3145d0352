//! MQTT outbound adapter: broker connection and the command publisher.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use tracing::info;

use crate::domain::command::{FeedCommand, ScheduleSetCommand};
use crate::domain::ports::{CommandPublisher, PublishError};
use crate::inbound::mqtt::TopicSet;

/// Unbounded enough for a dashboard; the device protocol is tiny.
const REQUEST_CHANNEL_CAPACITY: usize = 16;

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    pub client_id: String,
}

impl BrokerConfig {
    /// Parse a broker URL of the form `mqtt://host[:port]`; a bare
    /// `host[:port]` is accepted too. The port defaults to 1883.
    pub fn from_url(url: &str, client_id: impl Into<String>) -> Self {
        let stripped = url
            .strip_prefix("mqtt://")
            .or_else(|| url.strip_prefix("tcp://"))
            .unwrap_or(url);
        let (host, port) = match stripped.rsplit_once(':') {
            Some((host, port_str)) => match port_str.parse() {
                Ok(port) => (host, port),
                Err(_) => (stripped, 1883),
            },
            None => (stripped, 1883),
        };
        Self {
            host: host.to_owned(),
            port,
            client_id: client_id.into(),
        }
    }
}

/// Build the broker client and its event loop.
///
/// The client half feeds [`MqttCommandPublisher`]; the event loop half is
/// handed to the inbound subscriber task.
pub fn connect(config: &BrokerConfig) -> (AsyncClient, EventLoop) {
    info!(host = %config.host, port = config.port, "connecting to mqtt broker");
    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(Duration::from_secs(30));
    AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY)
}

/// rumqttc-backed implementation of the `CommandPublisher` port.
///
/// Publishes are QoS 1 fire-and-forget: the client queues the message even
/// while the broker link is down, which is exactly the original
/// dashboard's "sent once the transport accepts it" semantics.
#[derive(Clone)]
pub struct MqttCommandPublisher {
    client: AsyncClient,
    topics: TopicSet,
}

impl MqttCommandPublisher {
    /// Create a publisher over an established client.
    pub fn new(client: AsyncClient, topics: TopicSet) -> Self {
        Self { client, topics }
    }

    async fn publish(&self, topic: &str, payload: String) -> Result<(), PublishError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|err| PublishError::transport(err.to_string()))
    }
}

#[async_trait]
impl CommandPublisher for MqttCommandPublisher {
    async fn publish_feed(&self) -> Result<(), PublishError> {
        self.publish(&self.topics.cmd_feed, FeedCommand.encode())
            .await
    }

    async fn publish_schedule_set(&self, command: &ScheduleSetCommand) -> Result<(), PublishError> {
        self.publish(&self.topics.cmd_schedules, command.encode())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("mqtt://test.mosquitto.org", "test.mosquitto.org", 1883)]
    #[case("mqtt://broker.local:2883", "broker.local", 2883)]
    #[case("tcp://10.0.0.5:1884", "10.0.0.5", 1884)]
    #[case("plain-host", "plain-host", 1883)]
    fn broker_urls_parse(#[case] url: &str, #[case] host: &str, #[case] port: u16) {
        let config = BrokerConfig::from_url(url, "feeder-backend");
        assert_eq!(config.host, host);
        assert_eq!(config.port, port);
    }
}
