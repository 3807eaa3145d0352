//! Driven ports implemented by the outbound adapters.
//!
//! Each port ships a `thiserror`-derived error enum generated by
//! [`macros::define_port_error`], plus an in-memory fixture implementation
//! used by handler and service tests.

pub mod command_publisher;
pub mod feed_log_repository;
pub mod fixtures;
pub mod macros;
pub mod schedule_repository;

pub use command_publisher::{CommandPublisher, PublishError};
pub use feed_log_repository::{FeedLogRepository, FeedLogRepositoryError};
pub use fixtures::{
    MemoryFeedLogRepository, MemoryScheduleRepository, RecordedCommand, RecordingCommandPublisher,
};
pub use schedule_repository::{ScheduleRepository, ScheduleRepositoryError};
