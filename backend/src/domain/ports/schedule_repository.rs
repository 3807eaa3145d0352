use async_trait::async_trait;

use super::macros::define_port_error;
use crate::domain::schedule::{Schedule, ScheduleDraft, SchedulePatch};

define_port_error! {
    /// Errors surfaced by the persistence adapter when handling schedules.
    pub enum ScheduleRepositoryError {
        /// Database connectivity or pool failures.
        Connection { message: String } => "schedule store connection failed: {message}",
        /// Query or constraint failures that bubble up from the adapter.
        Query { message: String } => "schedule store query failed: {message}",
        /// No schedule exists with the given identifier.
        NotFound { id: i32 } => "no schedule with id {id}",
    }
}

/// Persistence port for feed schedules.
///
/// CRUD only; the 5-row cap and the full-state republish both live in the
/// schedule service, not here.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// All schedules ordered by time of day ascending.
    async fn list(&self) -> Result<Vec<Schedule>, ScheduleRepositoryError>;

    /// Insert a schedule, returning the stored row with its assigned id.
    async fn create(&self, draft: &ScheduleDraft) -> Result<Schedule, ScheduleRepositoryError>;

    /// Apply a partial update, returning the stored row.
    async fn update(
        &self,
        id: i32,
        patch: &SchedulePatch,
    ) -> Result<Schedule, ScheduleRepositoryError>;

    /// Delete a schedule by id.
    async fn delete(&self, id: i32) -> Result<(), ScheduleRepositoryError>;
}
