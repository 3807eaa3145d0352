//! Server configuration loaded from the environment.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

/// Fallback listen address when `BIND_ADDR` is absent or malformed.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Public test broker, matching the device firmware's default.
const DEFAULT_BROKER_URL: &str = "mqtt://test.mosquitto.org";
/// Topic prefix shared with the device firmware.
const DEFAULT_TOPIC_PREFIX: &str = "fishfeeder/01";
const DEFAULT_CLIENT_ID: &str = "feeder-backend";

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub broker_url: String,
    pub mqtt_client_id: String,
    pub topic_prefix: String,
}

impl ServerConfig {
    /// Read configuration from the environment, warning on fallbacks.
    ///
    /// `DATABASE_URL` has no default: without it the server refuses to
    /// start, which [`crate::server::run`] reports as an error.
    pub fn from_env() -> Self {
        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    warn!(value = %raw, error = %e, "ignoring malformed BIND_ADDR");
                    None
                }
            })
            .unwrap_or_else(|| {
                DEFAULT_BIND_ADDR
                    .parse()
                    .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
            });

        let database_url = env::var("DATABASE_URL").ok();
        if database_url.is_none() {
            warn!("DATABASE_URL is not set; the server cannot reach PostgreSQL");
        }

        let broker_url = env::var("MQTT_BROKER_URL").unwrap_or_else(|_| {
            warn!(default = DEFAULT_BROKER_URL, "MQTT_BROKER_URL not set");
            DEFAULT_BROKER_URL.into()
        });
        let mqtt_client_id =
            env::var("MQTT_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.into());
        let topic_prefix =
            env::var("MQTT_TOPIC_PREFIX").unwrap_or_else(|_| DEFAULT_TOPIC_PREFIX.into());

        Self {
            bind_addr,
            database_url,
            broker_url,
            mqtt_client_id,
            topic_prefix,
        }
    }
}
