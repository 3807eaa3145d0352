//! HTTP inbound adapter exposing the REST surface.

pub mod device;
pub mod error;
pub mod feed_logs;
pub mod schedules;
pub mod state;

pub use error::ApiResult;
