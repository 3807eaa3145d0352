//! PostgreSQL-backed `FeedLogRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{FeedLogRepository, FeedLogRepositoryError};
use crate::domain::{FeedLog, NewFeedLog};

use super::models::{FeedLogRow, NewFeedLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::feed_logs;

/// Diesel-backed implementation of the `FeedLogRepository` port.
#[derive(Clone)]
pub struct DieselFeedLogRepository {
    pool: DbPool,
}

impl DieselFeedLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedLogRepositoryError {
    FeedLogRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> FeedLogRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FeedLogRepositoryError::connection("database connection error")
        }
        _ => FeedLogRepositoryError::query("database error"),
    }
}

fn row_to_log(row: FeedLogRow) -> Result<FeedLog, FeedLogRepositoryError> {
    row.into_domain().map_err(FeedLogRepositoryError::query)
}

#[async_trait]
impl FeedLogRepository for DieselFeedLogRepository {
    async fn recent(&self, limit: i64) -> Result<Vec<FeedLog>, FeedLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FeedLogRow> = feed_logs::table
            .order(feed_logs::triggered_at.desc())
            .limit(limit)
            .select(FeedLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_log).collect()
    }

    async fn append(&self, entry: &NewFeedLog) -> Result<FeedLog, FeedLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: FeedLogRow = diesel::insert_into(feed_logs::table)
            .values(NewFeedLogRow {
                status: entry.status.as_str().to_owned(),
                feed_type: entry.feed_type.as_str().to_owned(),
                message: entry.message.clone(),
            })
            .returning(FeedLogRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_log(row)
    }
}
