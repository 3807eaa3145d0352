//! Schedule use-cases: CRUD plus the full-state device push.
//!
//! Every mutation ends with the complete enabled-schedule list being
//! republished, so the device always holds the desired state and never has
//! to reconcile deltas.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::command::ScheduleSetCommand;
use crate::domain::error::Error;
use crate::domain::ports::{
    CommandPublisher, PublishError, ScheduleRepository, ScheduleRepositoryError,
};
use crate::domain::schedule::{Schedule, ScheduleDraft, SchedulePatch, MAX_SCHEDULES};

/// Schedule service orchestrating the repository and the command port.
#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
    publisher: Arc<dyn CommandPublisher>,
}

fn map_repo_error(error: ScheduleRepositoryError) -> Error {
    match error {
        ScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("schedule store unavailable: {message}"))
        }
        ScheduleRepositoryError::Query { message } => {
            Error::internal(format!("schedule store error: {message}"))
        }
        ScheduleRepositoryError::NotFound { id } => {
            Error::not_found(format!("no schedule with id {id}")).with_details(json!({ "id": id }))
        }
    }
}

fn map_publish_error(error: PublishError) -> Error {
    let PublishError::Transport { message } = error;
    Error::internal(format!("Failed to send command: {message}"))
}

impl ScheduleService {
    /// Create a service over the given ports.
    pub fn new(repo: Arc<dyn ScheduleRepository>, publisher: Arc<dyn CommandPublisher>) -> Self {
        Self { repo, publisher }
    }

    /// All schedules, ordered by time of day.
    pub async fn list(&self) -> Result<Vec<Schedule>, Error> {
        self.repo.list().await.map_err(map_repo_error)
    }

    /// Create a schedule, enforcing the row cap and pushing the would-be
    /// schedule set to the device before the insert.
    ///
    /// The pre-insert publish mirrors the original dashboard: a device
    /// that never received the list must not have a row claiming
    /// otherwise. A publish failure therefore aborts the creation.
    pub async fn create(&self, draft: ScheduleDraft) -> Result<Schedule, Error> {
        let existing = self.repo.list().await.map_err(map_repo_error)?;
        if existing.len() >= MAX_SCHEDULES {
            return Err(Error::invalid_request("Maximum 5 schedules allowed")
                .with_details(json!({ "limit": MAX_SCHEDULES })));
        }

        let prospective = Schedule {
            id: 0,
            time: draft.time,
            enabled: draft.enabled,
            days: draft.days.clone(),
        };
        let command =
            ScheduleSetCommand::from_schedules(existing.iter().chain(Some(&prospective)));
        self.publisher
            .publish_schedule_set(&command)
            .await
            .map_err(map_publish_error)?;

        let created = self.repo.create(&draft).await.map_err(map_repo_error)?;
        info!(id = created.id, time = %created.time, "schedule created");
        Ok(created)
    }

    /// Apply a partial update, then republish the enabled set.
    pub async fn update(&self, id: i32, patch: SchedulePatch) -> Result<Schedule, Error> {
        let updated = self.repo.update(id, &patch).await.map_err(map_repo_error)?;
        self.republish().await?;
        Ok(updated)
    }

    /// Delete a schedule, then republish the enabled set.
    pub async fn delete(&self, id: i32) -> Result<(), Error> {
        self.repo.delete(id).await.map_err(map_repo_error)?;
        info!(id, "schedule deleted");
        self.republish().await
    }

    async fn republish(&self) -> Result<(), Error> {
        let schedules = self.repo.list().await.map_err(map_repo_error)?;
        let command = ScheduleSetCommand::from_schedules(&schedules);
        self.publisher
            .publish_schedule_set(&command)
            .await
            .map_err(map_publish_error)
    }
}
