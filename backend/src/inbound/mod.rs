//! Inbound adapters: HTTP handlers and the MQTT subscriber loop.

pub mod http;
pub mod mqtt;
