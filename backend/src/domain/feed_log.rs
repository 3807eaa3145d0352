//! Feed history entries.
//!
//! Feed logs are append-only: the system never updates or deletes them.
//! Each row records one feed attempt together with its last known outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a feed attempt.
///
/// `PENDING` rows are written when a command is accepted by the transport;
/// a later device status report may synthesize a `SUCCESS` row, but the
/// pending row itself is never reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedStatus {
    Success,
    Failed,
    Pending,
}

impl FeedStatus {
    /// Stable database/wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Pending => "PENDING",
        }
    }

    /// Parse the database form; unknown values are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// What initiated a feed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedType {
    Schedule,
    Manual,
}

impl FeedType {
    /// Stable database/wire form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Schedule => "SCHEDULE",
            Self::Manual => "MANUAL",
        }
    }

    /// Parse the database form; unknown values are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SCHEDULE" => Some(Self::Schedule),
            "MANUAL" => Some(Self::Manual),
            _ => None,
        }
    }

    /// Classify the source string a device status report carries.
    ///
    /// The device reports lowercase sources; anything that is not
    /// recognisably manual is attributed to the schedule, matching the
    /// dashboard's historical behaviour.
    pub fn from_reported_source(source: &str) -> Self {
        if source.eq_ignore_ascii_case("manual") {
            Self::Manual
        } else {
            Self::Schedule
        }
    }
}

/// A persisted feed history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedLog {
    /// Store-assigned identifier.
    pub id: i32,
    /// When the attempt was recorded.
    pub triggered_at: DateTime<Utc>,
    /// Last known outcome.
    pub status: FeedStatus,
    /// What initiated the attempt.
    #[serde(rename = "type")]
    pub feed_type: FeedType,
    /// Optional free-text diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Input payload for appending a feed log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedLog {
    /// Outcome to record.
    pub status: FeedStatus,
    /// What initiated the attempt.
    #[serde(rename = "type")]
    pub feed_type: FeedType,
    /// Optional free-text diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FeedStatus::Success, "SUCCESS")]
    #[case(FeedStatus::Failed, "FAILED")]
    #[case(FeedStatus::Pending, "PENDING")]
    fn status_string_forms_round_trip(#[case] status: FeedStatus, #[case] text: &str) {
        assert_eq!(status.as_str(), text);
        assert_eq!(FeedStatus::parse(text), Some(status));
    }

    #[rstest]
    #[case("manual", FeedType::Manual)]
    #[case("MANUAL", FeedType::Manual)]
    #[case("schedule", FeedType::Schedule)]
    #[case("", FeedType::Schedule)]
    #[case("timer", FeedType::Schedule)]
    fn reported_sources_classify(#[case] source: &str, #[case] expected: FeedType) {
        assert_eq!(FeedType::from_reported_source(source), expected);
    }

    #[test]
    fn log_serialises_with_wire_keys() {
        let log = FeedLog {
            id: 9,
            triggered_at: Utc::now(),
            status: FeedStatus::Pending,
            feed_type: FeedType::Manual,
            message: Some("Command sent to device".into()),
        };
        let value = serde_json::to_value(&log).expect("serialise");
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["type"], "MANUAL");
        assert!(value["triggeredAt"].is_string());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(FeedStatus::parse("DONE"), None);
        assert_eq!(FeedType::parse("AUTO"), None);
    }
}
