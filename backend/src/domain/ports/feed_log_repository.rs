use async_trait::async_trait;

use super::macros::define_port_error;
use crate::domain::feed_log::{FeedLog, NewFeedLog};

define_port_error! {
    /// Errors surfaced by the persistence adapter when handling feed logs.
    pub enum FeedLogRepositoryError {
        /// Database connectivity or pool failures.
        Connection { message: String } => "feed log store connection failed: {message}",
        /// Query failures that bubble up from the adapter.
        Query { message: String } => "feed log store query failed: {message}",
    }
}

/// Persistence port for the append-only feed history.
#[async_trait]
pub trait FeedLogRepository: Send + Sync {
    /// The most recent entries, newest `triggered_at` first, at most
    /// `limit` rows.
    async fn recent(&self, limit: i64) -> Result<Vec<FeedLog>, FeedLogRepositoryError>;

    /// Append one entry; `triggered_at` is stamped by the store.
    async fn append(&self, entry: &NewFeedLog) -> Result<FeedLog, FeedLogRepositoryError>;
}
