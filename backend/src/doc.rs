//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (schedules,
//!   feed logs, device)
//! - **Schemas**: The domain types the endpoints exchange
//!
//! The generated specification is served by Swagger UI in debug builds.

use crate::domain::{
    DeviceSnapshot, Error, ErrorCode, FeedAck, FeedLog, FeedStatus, FeedType, NewFeedLog, Schedule,
    ScheduleDraft, SchedulePatch,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fish feeder backend API",
        description = "HTTP interface for feeding schedules, feed history, and live device state."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::schedules::list_schedules,
        crate::inbound::http::schedules::create_schedule,
        crate::inbound::http::schedules::update_schedule,
        crate::inbound::http::schedules::delete_schedule,
        crate::inbound::http::feed_logs::list_feed_logs,
        crate::inbound::http::feed_logs::create_feed_log,
        crate::inbound::http::device::device_status,
        crate::inbound::http::device::manual_feed,
    ),
    components(schemas(
        Schedule,
        ScheduleDraft,
        SchedulePatch,
        FeedLog,
        NewFeedLog,
        FeedStatus,
        FeedType,
        DeviceSnapshot,
        FeedAck,
        Error,
        ErrorCode
    )),
    tags(
        (name = "schedules", description = "Feeding schedule management"),
        (name = "feed-logs", description = "Feed history"),
        (name = "device", description = "Device status and commands")
    )
)]
pub struct ApiDoc;
