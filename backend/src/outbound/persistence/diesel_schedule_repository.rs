//! PostgreSQL-backed `ScheduleRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ScheduleRepository, ScheduleRepositoryError};
use crate::domain::{Schedule, ScheduleDraft, SchedulePatch};

use super::models::{NewScheduleRow, ScheduleChangeset, ScheduleRow};
use super::pool::{DbPool, PoolError};
use super::schema::schedules;

/// Diesel-backed implementation of the `ScheduleRepository` port.
#[derive(Clone)]
pub struct DieselScheduleRepository {
    pool: DbPool,
}

impl DieselScheduleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScheduleRepositoryError {
    ScheduleRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> ScheduleRepositoryError {
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
        DieselError::NotFound => ScheduleRepositoryError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ScheduleRepositoryError::connection("database connection error")
        }
        _ => ScheduleRepositoryError::query("database error"),
    }
}

fn row_to_schedule(row: ScheduleRow) -> Result<Schedule, ScheduleRepositoryError> {
    row.into_domain().map_err(ScheduleRepositoryError::query)
}

#[async_trait]
impl ScheduleRepository for DieselScheduleRepository {
    async fn list(&self) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ScheduleRow> = schedules::table
            .order(schedules::time.asc())
            .select(ScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_schedule).collect()
    }

    async fn create(&self, draft: &ScheduleDraft) -> Result<Schedule, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ScheduleRow = diesel::insert_into(schedules::table)
            .values(NewScheduleRow {
                time: draft.time.to_string(),
                enabled: draft.enabled,
                days: draft.days.clone(),
            })
            .returning(ScheduleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_schedule(row)
    }

    async fn update(
        &self,
        id: i32,
        patch: &SchedulePatch,
    ) -> Result<Schedule, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // An empty changeset is a plain read; Diesel rejects UPDATEs with
        // no assignments.
        let row: Option<ScheduleRow> = if patch.is_empty() {
            schedules::table
                .find(id)
                .select(ScheduleRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        } else {
            diesel::update(schedules::table.find(id))
                .set(ScheduleChangeset {
                    time: patch.time.map(|time| time.to_string()),
                    enabled: patch.enabled,
                    days: patch.days.clone(),
                })
                .returning(ScheduleRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?
        };

        let row = row.ok_or_else(|| ScheduleRepositoryError::not_found(id))?;
        row_to_schedule(row)
    }

    async fn delete(&self, id: i32) -> Result<(), ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(schedules::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if deleted == 0 {
            return Err(ScheduleRepositoryError::not_found(id));
        }
        Ok(())
    }
}
