//! Feeder backend library modules.
//!
//! The crate is laid out hexagonally: `domain` holds entities, services,
//! and ports; `inbound` adapts HTTP and MQTT traffic onto the domain;
//! `outbound` implements the driven ports against PostgreSQL and the MQTT
//! broker; `server` assembles everything.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::trace::Trace;
