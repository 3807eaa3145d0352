//! PostgreSQL persistence adapters (Diesel, async via `diesel-async`).

pub mod diesel_feed_log_repository;
pub mod diesel_schedule_repository;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_feed_log_repository::DieselFeedLogRepository;
pub use diesel_schedule_repository::DieselScheduleRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
