//! Domain entities, services, and ports.
//!
//! Purpose: define the strongly typed model shared by the HTTP and MQTT
//! adapters and the persistence layer. Types here are transport agnostic;
//! invariants and serialisation contracts are documented on each type.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — central error taxonomy mapped by adapters.
//! - `Schedule` / `FeedLog` — persisted entities.
//! - `StatusBoard` / `DeviceSnapshot` / `DeviceEvent` — in-memory device
//!   state and the classified inbound events that mutate it.
//! - `ScheduleService` / `FeedService` — use-case services over the ports.

pub mod command;
pub mod device;
pub mod error;
pub mod feed_log;
pub mod feed_service;
pub mod ports;
pub mod schedule;
pub mod schedule_service;

pub use self::command::{FeedCommand, ScheduleSetCommand};
pub use self::device::{DeviceEvent, DeviceSnapshot, StatusBoard};
pub use self::error::{Error, ErrorCode};
pub use self::feed_log::{FeedLog, FeedStatus, FeedType, NewFeedLog};
pub use self::feed_service::{FeedAck, FeedService};
pub use self::schedule::{
    Schedule, ScheduleDraft, SchedulePatch, ScheduleTime, ScheduleTimeError, MAX_SCHEDULES,
};
pub use self::schedule_service::ScheduleService;
