//! Row types mapping between the database schema and domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{feed_logs, schedules};
use crate::domain::{FeedLog, FeedStatus, FeedType, Schedule};

/// A stored schedule row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    pub id: i32,
    pub time: String,
    pub enabled: bool,
    pub days: Option<String>,
}

impl ScheduleRow {
    /// Convert to the domain entity; fails on a corrupt `time` value.
    pub fn into_domain(self) -> Result<Schedule, String> {
        let time = self
            .time
            .parse()
            .map_err(|err| format!("corrupt schedule time in row {}: {err}", self.id))?;
        Ok(Schedule {
            id: self.id,
            time,
            enabled: self.enabled,
            days: self.days,
        })
    }
}

/// Insertable schedule row.
#[derive(Debug, Insertable)]
#[diesel(table_name = schedules)]
pub struct NewScheduleRow {
    pub time: String,
    pub enabled: bool,
    pub days: Option<String>,
}

/// Partial schedule update; `None` fields are left untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = schedules)]
pub struct ScheduleChangeset {
    pub time: Option<String>,
    pub enabled: Option<bool>,
    pub days: Option<String>,
}

/// A stored feed log row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feed_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedLogRow {
    pub id: i32,
    pub triggered_at: DateTime<Utc>,
    pub status: String,
    pub feed_type: String,
    pub message: Option<String>,
}

impl FeedLogRow {
    /// Convert to the domain entity; fails on corrupt enum columns.
    pub fn into_domain(self) -> Result<FeedLog, String> {
        let status = FeedStatus::parse(&self.status)
            .ok_or_else(|| format!("corrupt feed status in row {}: {:?}", self.id, self.status))?;
        let feed_type = FeedType::parse(&self.feed_type).ok_or_else(|| {
            format!("corrupt feed type in row {}: {:?}", self.id, self.feed_type)
        })?;
        Ok(FeedLog {
            id: self.id,
            triggered_at: self.triggered_at,
            status,
            feed_type,
            message: self.message,
        })
    }
}

/// Insertable feed log row; `triggered_at` defaults in the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = feed_logs)]
pub struct NewFeedLogRow {
    pub status: String,
    pub feed_type: String,
    pub message: Option<String>,
}
