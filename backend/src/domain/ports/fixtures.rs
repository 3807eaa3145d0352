//! In-memory port implementations for tests and offline development.
//!
//! These back the handler and service tests so the HTTP surface can be
//! exercised without PostgreSQL or a broker, mirroring how the dashboard
//! behaves against real adapters.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::command_publisher::{CommandPublisher, PublishError};
use super::feed_log_repository::{FeedLogRepository, FeedLogRepositoryError};
use super::schedule_repository::{ScheduleRepository, ScheduleRepositoryError};
use crate::domain::command::ScheduleSetCommand;
use crate::domain::feed_log::{FeedLog, NewFeedLog};
use crate::domain::schedule::{Schedule, ScheduleDraft, SchedulePatch};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Vec-backed [`ScheduleRepository`].
#[derive(Debug, Default)]
pub struct MemoryScheduleRepository {
    rows: Mutex<Vec<Schedule>>,
    next_id: AtomicI32,
}

impl MemoryScheduleRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Repository pre-seeded with the given rows.
    pub fn with_rows(rows: Vec<Schedule>) -> Self {
        let next = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        Self {
            rows: Mutex::new(rows),
            next_id: AtomicI32::new(next),
        }
    }

    /// Current row count.
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    /// True when no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ScheduleRepository for MemoryScheduleRepository {
    async fn list(&self) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let mut rows = lock(&self.rows).clone();
        rows.sort_by_key(|row| row.time);
        Ok(rows)
    }

    async fn create(&self, draft: &ScheduleDraft) -> Result<Schedule, ScheduleRepositoryError> {
        let schedule = Schedule {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            time: draft.time,
            enabled: draft.enabled,
            days: draft.days.clone(),
        };
        lock(&self.rows).push(schedule.clone());
        Ok(schedule)
    }

    async fn update(
        &self,
        id: i32,
        patch: &SchedulePatch,
    ) -> Result<Schedule, ScheduleRepositoryError> {
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or_else(|| ScheduleRepositoryError::not_found(id))?;
        if let Some(time) = patch.time {
            row.time = time;
        }
        if let Some(enabled) = patch.enabled {
            row.enabled = enabled;
        }
        if let Some(days) = &patch.days {
            row.days = Some(days.clone());
        }
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), ScheduleRepositoryError> {
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(ScheduleRepositoryError::not_found(id));
        }
        Ok(())
    }
}

/// Vec-backed [`FeedLogRepository`].
#[derive(Debug, Default)]
pub struct MemoryFeedLogRepository {
    rows: Mutex<Vec<FeedLog>>,
    next_id: AtomicI32,
}

impl MemoryFeedLogRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// All stored rows in insertion order, for assertions.
    pub fn all(&self) -> Vec<FeedLog> {
        lock(&self.rows).clone()
    }

    /// Current row count.
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    /// True when no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl FeedLogRepository for MemoryFeedLogRepository {
    async fn recent(&self, limit: i64) -> Result<Vec<FeedLog>, FeedLogRepositoryError> {
        let mut rows = lock(&self.rows).clone();
        rows.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn append(&self, entry: &NewFeedLog) -> Result<FeedLog, FeedLogRepositoryError> {
        let log = FeedLog {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            triggered_at: Utc::now(),
            status: entry.status,
            feed_type: entry.feed_type,
            message: entry.message.clone(),
        };
        lock(&self.rows).push(log.clone());
        Ok(log)
    }
}

/// A published message captured by [`RecordingCommandPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    /// A manual feed command.
    Feed,
    /// A schedule-set push with its wire payload.
    ScheduleSet { payload: String },
}

/// [`CommandPublisher`] that records commands instead of sending them.
///
/// Flip `fail_next` to make the following publish report a transport
/// error, for exercising the failure paths.
#[derive(Debug, Default)]
pub struct RecordingCommandPublisher {
    commands: Mutex<Vec<RecordedCommand>>,
    fail_next: AtomicBool,
}

impl RecordingCommandPublisher {
    /// Publisher that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next publish fail with a transport error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<RecordedCommand> {
        lock(&self.commands).clone()
    }

    fn check_failure(&self) -> Result<(), PublishError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PublishError::transport("simulated broker failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CommandPublisher for RecordingCommandPublisher {
    async fn publish_feed(&self) -> Result<(), PublishError> {
        self.check_failure()?;
        lock(&self.commands).push(RecordedCommand::Feed);
        Ok(())
    }

    async fn publish_schedule_set(&self, command: &ScheduleSetCommand) -> Result<(), PublishError> {
        self.check_failure()?;
        lock(&self.commands).push(RecordedCommand::ScheduleSet {
            payload: command.encode(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feed_log::{FeedStatus, FeedType};

    #[tokio::test]
    async fn schedule_rows_list_sorted_by_time() {
        let repo = MemoryScheduleRepository::new();
        for time in ["19:00", "06:30", "12:00"] {
            repo.create(&ScheduleDraft {
                time: time.parse().expect("valid time"),
                enabled: true,
                days: None,
            })
            .await
            .expect("create");
        }
        let times: Vec<String> = repo
            .list()
            .await
            .expect("list")
            .iter()
            .map(|row| row.time.to_string())
            .collect();
        assert_eq!(times, ["06:30", "12:00", "19:00"]);
    }

    #[tokio::test]
    async fn seeded_repository_assigns_ids_after_the_seed() {
        let repo = MemoryScheduleRepository::with_rows(vec![
            Schedule {
                id: 3,
                time: "07:00".parse().expect("valid time"),
                enabled: true,
                days: None,
            },
            Schedule {
                id: 8,
                time: "19:00".parse().expect("valid time"),
                enabled: false,
                days: None,
            },
        ]);
        assert_eq!(repo.len(), 2);

        let created = repo
            .create(&ScheduleDraft {
                time: "12:00".parse().expect("valid time"),
                enabled: true,
                days: None,
            })
            .await
            .expect("create");
        assert_eq!(created.id, 9);
    }

    #[tokio::test]
    async fn update_missing_schedule_reports_not_found() {
        let repo = MemoryScheduleRepository::new();
        let err = repo
            .update(42, &SchedulePatch::default())
            .await
            .expect_err("missing row");
        assert_eq!(err, ScheduleRepositoryError::not_found(42_i32));
    }

    #[tokio::test]
    async fn recent_limits_and_orders_logs() {
        let repo = MemoryFeedLogRepository::new();
        for _ in 0..4 {
            repo.append(&NewFeedLog {
                status: FeedStatus::Pending,
                feed_type: FeedType::Manual,
                message: None,
            })
            .await
            .expect("append");
        }
        let recent = repo.recent(3).await.expect("recent");
        assert_eq!(recent.len(), 3);
        assert!(recent
            .windows(2)
            .all(|pair| pair[0].triggered_at >= pair[1].triggered_at));
    }

    #[tokio::test]
    async fn recording_publisher_fails_exactly_once() {
        let publisher = RecordingCommandPublisher::new();
        publisher.fail_next();
        assert!(publisher.publish_feed().await.is_err());
        assert!(publisher.publish_feed().await.is_ok());
        assert_eq!(publisher.published(), vec![RecordedCommand::Feed]);
    }
}
